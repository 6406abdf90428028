//! Panel alignment pipeline stages.
//!
//! Modules include:
//! - `normalize`: resolve identifiers of one source into the other's identifier space
//! - `dates`: coerce date cells and collect date sets
//! - `align`: outer join on (identifier, date)
//! - `fill`: roll quarterly values down across monthly rows
//! - `reduce`: restrict to the securities' rows and drop no-information columns
/// Outer join of the two inputs.
pub mod align;
/// Date coercion helpers.
pub mod dates;
/// Roll-down filling within identifier groups.
pub mod fill;
/// The keyed, sorted panel type.
pub mod frame;
/// Identifier resolvers and normalization.
pub mod normalize;
/// Row-set reduction.
pub mod reduce;
