#[cfg(feature = "bench_trace")]
use fourcolor::{algorithms::boundary::walk_outer, Engine, NodeId};
#[cfg(feature = "bench_trace")]
use std::time::Instant;

#[cfg(not(feature = "bench_trace"))]
fn main() {
    panic!("trace_bench requires --features bench_trace");
}

// Zig-zag strip of triangles growing to the right of the anchors. Every node
// stays on the outer boundary, so each insertion is accepted.
#[cfg(feature = "bench_trace")]
fn build_strip(n: usize) -> Engine {
    let mut e = Engine::new();
    let Some((a, b)) = e.anchors() else {
        return e;
    };
    let mut chain: Vec<NodeId> = vec![a, b];
    for i in 0..n {
        let x = 100.0 + 40.0 * i as f32;
        let y = if i % 2 == 0 { 100.0 } else { 180.0 };
        let k = chain.len();
        let id = match e.create_node(x, y, &chain[k - 2..]) {
            Ok(id) => id,
            Err(_) => match e.create_node(x, y, &chain[k - 1..]) {
                Ok(id) => id,
                Err(err) => {
                    tracing::warn!(i, error = %err, "strip stopped early");
                    break;
                }
            },
        };
        e.finalize();
        chain.push(id);
    }
    e
}

#[cfg(feature = "bench_trace")]
fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut n = 2000usize;
    let mut repeats = 20usize;
    for a in &args[1..] {
        if let Some(val) = a.strip_prefix("--n=") {
            if let Ok(v) = val.parse() {
                n = v;
            }
        } else if let Some(val) = a.strip_prefix("--repeats=") {
            if let Ok(v) = val.parse() {
                repeats = v;
            }
        }
    }

    let t_build = Instant::now();
    let mut e = build_strip(n);
    let build_ms = t_build.elapsed().as_secs_f64() * 1000.0;

    let mut walk_times: Vec<f64> = Vec::with_capacity(repeats);
    let mut steps = 0usize;
    for _ in 0..repeats {
        let t = Instant::now();
        if let Ok(w) = walk_outer(e.store()) {
            steps = w.steps.len();
        }
        walk_times.push(t.elapsed().as_secs_f64() * 1000.0);
    }
    let avg_walk = if walk_times.is_empty() {
        0.0
    } else {
        walk_times.iter().sum::<f64>() / (walk_times.len() as f64)
    };

    // Full cascade: reopen the newest node and nudge it
    let mut move_ms = 0.0;
    if let Some(last) = e.reopen_last() {
        if let Some(p) = e.position(last) {
            let t = Instant::now();
            let _ = e.move_node(last, p.x + 5.0, p.y);
            move_ms = t.elapsed().as_secs_f64() * 1000.0;
        }
    }

    println!(
        "nodes={} edges={} steps={} build_ms={:.3} avg_walk_ms={:.3} move_ms={:.3}",
        e.node_count(),
        e.edge_count(),
        steps,
        build_ms,
        avg_walk,
        move_ms
    );
}
