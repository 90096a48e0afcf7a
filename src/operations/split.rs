use tracing::debug;

use crate::geometry::geometry_line::optimize_geometry_line;
use crate::geometry::GeometryLine;
use crate::operations::intersect::iterate_geometry_lines_self_intersection_points;

/// Recursion cap; each level removes one crossing.
const MAX_SPLIT_DEPTH: usize = 64;

/// A place on a chain: the piece index and the param on that piece.
#[derive(Debug, Clone, Copy)]
struct ChainPoint {
    index: usize,
    param: f64,
}

/// The pieces between two places, `from` coming first along the chain.
fn get_chain_slice(lines: &[GeometryLine], from: ChainPoint, to: ChainPoint) -> Vec<GeometryLine> {
    let pieces = if from.index == to.index {
        vec![lines[from.index].part(from.param, to.param)]
    } else {
        let mut pieces = vec![lines[from.index].part(from.param, lines[from.index].param_range().1)];
        pieces.extend(lines[from.index + 1..to.index].iter().cloned());
        pieces.push(lines[to.index].part(lines[to.index].param_range().0, to.param));
        pieces
    };
    pieces.iter().filter_map(optimize_geometry_line).collect()
}

/// Splits `lines` at every self-intersection.
///
/// Each crossing cuts off the loop between its two visits; the loop and the
/// remaining chain are split further. A closed chain yields simple loops, an
/// open chain yields one open branch plus the loops cut out of it.
#[must_use]
pub fn split_geometry_lines(lines: &[GeometryLine]) -> Vec<Vec<GeometryLine>> {
    let mut result = Vec::new();
    split_into(lines.to_vec(), &mut result, 0);
    result
}

fn split_into(lines: Vec<GeometryLine>, result: &mut Vec<Vec<GeometryLine>>, depth: usize) {
    if lines.is_empty() {
        return;
    }
    if depth >= MAX_SPLIT_DEPTH {
        debug!(depth, "chain splitting stopped at the depth cap");
        result.push(lines);
        return;
    }
    let Some(hit) = iterate_geometry_lines_self_intersection_points(&lines).next() else {
        result.push(lines);
        return;
    };
    debug!(index1 = hit.index1, index2 = hit.index2, "chain split at a self-intersection");
    let first = ChainPoint {
        index: hit.index1,
        param: hit.t1,
    };
    let second = ChainPoint {
        index: hit.index2,
        param: hit.t2,
    };
    let last = lines.len() - 1;
    let start = ChainPoint {
        index: 0,
        param: lines[0].param_range().0,
    };
    let end = ChainPoint {
        index: last,
        param: lines[last].param_range().1,
    };
    let inner = get_chain_slice(&lines, first, second);
    let mut outer = get_chain_slice(&lines, start, first);
    outer.extend(get_chain_slice(&lines, second, end));
    split_into(outer, result, depth + 1);
    split_into(inner, result, depth + 1);
}
