use criterion::{criterion_group, criterion_main, Criterion};
use edgevision::{
    image::{Extent, Frame},
    FrameProcessor,
};

const DIMS: [(u32, u32); 5] = [
    (320, 240),
    (640, 480),
    (960, 540),
    (1280, 720),
    (1920, 1080),
];

pub fn benchmark_convert(c: &mut Criterion) {
    for (name, canny) in [("gray", false), ("canny", true)] {
        let mut group = c.benchmark_group(format!("convert/{}", name));
        for dim in DIMS.iter() {
            let data = vec![96u8; Extent::new(dim.0, dim.1).frame_len()];
            let frame = Frame::new(&data, dim.0 as i32, dim.1 as i32).unwrap();
            let mut processor = FrameProcessor::new();
            group.bench_with_input(format!("{}x{}", dim.0, dim.1), &frame, |b, frame| {
                b.iter(|| {
                    if canny {
                        processor.to_edges(frame).len()
                    } else {
                        processor.to_gray(frame).len()
                    }
                })
            });
        }
    }
}

criterion_group!(benches, benchmark_convert);
criterion_main!(benches);
