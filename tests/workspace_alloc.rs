// tests/workspace_alloc.rs
// Validate that workspace-backed matrices are reused across alignments
// (no reallocation) when the shape does not grow.

use ferrous_hashmatch::PopcountTable;
use ferrous_hashmatch::core::alignment::workspace::{AlignmentWorkspace, with_workspace};

#[test]
fn workspace_matrices_reuse_no_realloc_for_same_shape() {
    let table = PopcountTable::global();
    with_workspace(|ws: &mut AlignmentWorkspace| {
        let q: Vec<u16> = (0..64).map(|i| i * 31).collect();
        let c: Vec<u16> = (0..64).map(|i| i * 17 + 3).collect();

        ws.align(&q, &c, table, 0.5, 1).unwrap();
        let d_ptr0 = ws.distance.as_slice().as_ptr();
        let p_ptr0 = ws.path_length.as_slice().as_ptr();

        ws.align(&c, &q, table, 0.5, 1).unwrap();
        let d_ptr1 = ws.distance.as_slice().as_ptr();
        let p_ptr1 = ws.path_length.as_slice().as_ptr();

        assert_eq!(d_ptr0, d_ptr1, "distance matrix reallocated between same-shape alignments");
        assert_eq!(p_ptr0, p_ptr1, "path length matrix reallocated between same-shape alignments");
    });
}

#[test]
fn workspace_matrices_reuse_no_realloc_when_shrinking() {
    let table = PopcountTable::global();
    with_workspace(|ws| {
        ws.align(&[1; 100], &[2; 120], table, 0.0, 1).unwrap();
        let d_ptr0 = ws.distance.as_slice().as_ptr();
        let capacity0 = ws.distance.capacity();

        ws.align(&[1; 10], &[2; 12], table, 0.0, 1).unwrap();
        assert_eq!(ws.distance.shape(), (10, 12));
        assert_eq!(ws.distance.as_slice().as_ptr(), d_ptr0);
        assert_eq!(ws.distance.capacity(), capacity0);
    });
}
