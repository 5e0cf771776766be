/// Centre Y of each entry of a vertical stack resting on `base_y`.
///
/// Entry `i` sits on top of entries `0..i`: its centre is `base_y`, plus the
/// summed extents below it, plus half its own extent.
pub fn stack_centers(base_y: f32, extents: &[f32]) -> Vec<f32> {
    let mut floor = base_y;
    extents
        .iter()
        .map(|&extent| {
            let center = floor + extent * 0.5;
            floor += extent;
            center
        })
        .collect()
}

/// Y of the top surface of the stack.
pub fn stack_top(base_y: f32, extents: &[f32]) -> f32 {
    base_y + extents.iter().sum::<f32>()
}

/// Largest gap or overlap between neighbouring entries placed at `centers`.
///
/// Zero for a perfectly contiguous stack. Used to check the layout invariant.
pub fn max_seam_error(base_y: f32, extents: &[f32], centers: &[f32]) -> f32 {
    let mut floor = base_y;
    let mut worst = 0.0_f32;
    for (&extent, &center) in extents.iter().zip(centers) {
        let bottom = center - extent * 0.5;
        worst = worst.max((bottom - floor).abs());
        floor = center + extent * 0.5;
    }
    worst
}
