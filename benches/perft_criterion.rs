use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use minnow::board::Position;
use minnow::movegen::perft;

struct BenchCase {
    name: &'static str,
    fen: &'static str,
    expected_nodes: &'static [u64],
}

const CASES: &[BenchCase] = &[
    BenchCase {
        name: "startpos",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        expected_nodes: &[20, 400, 8902],
    },
    BenchCase {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        expected_nodes: &[48, 2039],
    },
    BenchCase {
        name: "endgame",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        expected_nodes: &[14, 191, 2812],
    },
];

fn perft_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");

    for case in CASES {
        for (i, &expected) in case.expected_nodes.iter().enumerate() {
            let depth = (i + 1) as u32;
            let mut pos = Position::from_fen(case.fen).expect("bench FEN is valid");

            // Fail the run outright if the generator is wrong; timing a
            // broken generator is meaningless.
            assert_eq!(perft(&mut pos, depth), expected, "{} depth {}", case.name, depth);

            group.throughput(Throughput::Elements(expected));
            group.bench_with_input(
                BenchmarkId::new(case.name, depth),
                &depth,
                |b, &depth| {
                    b.iter(|| {
                        let nodes = perft(black_box(&mut pos), depth);
                        black_box(nodes)
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, perft_benchmarks);
criterion_main!(benches);
