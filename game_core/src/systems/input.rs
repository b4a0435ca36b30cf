use hecs::{Entity, World};

use crate::components::*;
use crate::resources::*;
use crate::{Scale, Sound};

/// Launch the player upward
///
/// Ignored while the player is dead or already above the top of the
/// viewport. Returns whether the jump happened.
pub fn jump(world: &mut World, player: Entity, scale: &Scale, events: &mut Events) -> bool {
    let Ok((p, body)) = world.query_one_mut::<(&mut Player, &mut Body)>(player) else {
        return false;
    };

    if !p.alive || body.pos.y < 0.0 {
        return false;
    }

    body.vel.y = scale.jump_velocity;
    p.start_jump_tilt();
    events.jumped = true;
    events.sounds.push(Sound::Jump);
    true
}
