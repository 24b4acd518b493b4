use thiserror::Error;

/// Errors raised while building a [`Flock`](crate::flock::Flock).
///
/// Stepping never fails, only malformed configuration does.
#[derive(Debug, Error, PartialEq)]
pub enum FlockError {
    /// World dimensions must be positive and finite.
    #[error("world size must be positive and finite, got {width}x{height}")]
    InvalidWorldSize { width: f32, height: f32 },

    /// A [`FlockOptions`](crate::options::FlockOptions) value is out of range.
    #[error("invalid flock options: {0}")]
    InvalidOptions(&'static str),

    /// A hand placed boid has a non-finite position or no heading.
    #[error("boid {id} has a non-finite position or a zero heading")]
    InvalidBoid { id: usize },

    /// Two hand placed boids share an id.
    #[error("boid id {id} is used more than once")]
    DuplicateBoidId { id: usize },
}
