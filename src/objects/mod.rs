pub mod rigid_body;

pub use rigid_body::{BodyId, RigidBody};

/// Borrows two distinct bodies of a slice mutably at once.
/// Panics if the indices are equal or out of bounds.
pub(crate) fn get_mutable_body_pair(
    bodies: &mut [RigidBody],
    idx_a: usize,
    idx_b: usize,
) -> (&mut RigidBody, &mut RigidBody) {
    assert_ne!(idx_a, idx_b, "A body cannot be paired with itself");

    if idx_a < idx_b {
        let (head, tail) = bodies.split_at_mut(idx_b);
        (&mut head[idx_a], &mut tail[0])
    } else {
        let (head, tail) = bodies.split_at_mut(idx_a);
        (&mut tail[0], &mut head[idx_b])
    }
}
