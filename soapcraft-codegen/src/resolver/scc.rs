//! Tarjan's strongly-connected-components algorithm over a
//! [`DependencyGraph`] (spec.md §4.3 step 4: "Multi-node SCCs are the
//! cyclic type groups; singletons that self-refer are also cyclic").
//!
//! Implemented iteratively (an explicit work stack standing in for the
//! call stack) rather than recursively: a dependency chain following a
//! deeply nested WSDL's type graph can run deeper than a comfortable
//! native stack frame budget.

use crate::resolver::graph::DependencyGraph;
use crate::resolver::type_map::DeclId;

/// Returns every SCC in the graph, each as a `Vec<DeclId>`. A component of
/// size 1 is only "cyclic" if its sole member has a self-edge; callers
/// that need that distinction should check
/// `graph.neighbors(id).contains(&id)` themselves, since a singleton SCC
/// with no self-edge is just an ordinary acyclic node.
pub fn compute_sccs(graph: &DependencyGraph) -> Vec<Vec<DeclId>> {
    let n = graph.node_count();
    let mut index = vec![None; n];
    let mut low_link = vec![0u32; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<DeclId> = Vec::new();
    let mut next_index = 0u32;
    let mut sccs = Vec::new();

    for start in 0..n {
        if index[start].is_some() {
            continue;
        }
        strong_connect(
            DeclId(start as u32),
            graph,
            &mut index,
            &mut low_link,
            &mut on_stack,
            &mut stack,
            &mut next_index,
            &mut sccs,
        );
    }

    sccs
}

enum Frame {
    Enter(DeclId),
    AfterChild(DeclId, DeclId),
}

#[allow(clippy::too_many_arguments)]
fn strong_connect(
    root: DeclId,
    graph: &DependencyGraph,
    index: &mut [Option<u32>],
    low_link: &mut [u32],
    on_stack: &mut [bool],
    stack: &mut Vec<DeclId>,
    next_index: &mut u32,
    sccs: &mut Vec<Vec<DeclId>>,
) {
    let mut work = vec![Frame::Enter(root)];
    let mut child_cursor = vec![0usize; graph.node_count()];

    while let Some(frame) = work.pop() {
        match frame {
            Frame::Enter(v) => {
                let vi = v.0 as usize;
                if index[vi].is_some() {
                    continue;
                }
                index[vi] = Some(*next_index);
                low_link[vi] = *next_index;
                *next_index += 1;
                stack.push(v);
                on_stack[vi] = true;

                advance(v, graph, index, low_link, on_stack, stack, next_index, sccs, &mut work, &mut child_cursor);
            }
            Frame::AfterChild(v, w) => {
                let vi = v.0 as usize;
                let wi = w.0 as usize;
                low_link[vi] = low_link[vi].min(low_link[wi]);
                advance(v, graph, index, low_link, on_stack, stack, next_index, sccs, &mut work, &mut child_cursor);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn advance(
    v: DeclId,
    graph: &DependencyGraph,
    index: &mut [Option<u32>],
    low_link: &mut [u32],
    on_stack: &mut [bool],
    stack: &mut Vec<DeclId>,
    next_index: &mut u32,
    sccs: &mut Vec<Vec<DeclId>>,
    work: &mut Vec<Frame>,
    child_cursor: &mut [usize],
) {
    let vi = v.0 as usize;
    let neighbors = graph.neighbors(v);
    while child_cursor[vi] < neighbors.len() {
        let w = neighbors[child_cursor[vi]];
        child_cursor[vi] += 1;
        let wi = w.0 as usize;

        if index[wi].is_none() {
            work.push(Frame::AfterChild(v, w));
            work.push(Frame::Enter(w));
            return;
        } else if on_stack[wi] {
            low_link[vi] = low_link[vi].min(index[wi].unwrap());
        }
    }

    if low_link[vi] == index[vi].unwrap() {
        let mut component = Vec::new();
        loop {
            let w = stack.pop().expect("stack non-empty while closing an SCC root");
            on_stack[w.0 as usize] = false;
            component.push(w);
            if w == v {
                break;
            }
        }
        sccs.push(component);
    }
}
