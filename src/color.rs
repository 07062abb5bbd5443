//! Cell coloring for token tables
//!
//! Diverging map: positive activations red, negative blue, opacity scaled
//! by magnitude relative to the largest |value| in the table so the two
//! tables share one scale.

/// CSS background color for an activation value.
///
/// `max_abs` is the table-wide maximum |value|; a zero or non-finite
/// `max_abs` renders fully transparent.
pub fn cell_color(value: f32, max_abs: f32) -> String {
    let t = if max_abs > 0.0 && max_abs.is_finite() {
        (value.abs() / max_abs).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (r, g, b) = if value >= 0.0 { (220, 38, 38) } else { (37, 99, 235) };
    format!("rgba({r}, {g}, {b}, {:.3})", t * 0.8)
}
