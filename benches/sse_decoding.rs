//! Benchmark for SSE decoding throughput

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fabric_desk::sse::SseDecoder;

fn sse_payload(frames: usize) -> Vec<u8> {
    let mut body = String::new();
    for i in 0..frames {
        body.push_str(&format!(
            "data: {{\"type\":\"content\",\"content\":\"token {} \",\"format\":\"markdown\"}}\n\n",
            i
        ));
    }
    body.push_str("data: {\"type\":\"complete\",\"content\":\"\"}\n\n");
    body.into_bytes()
}

fn bench_decode_single_buffer(c: &mut Criterion) {
    let payload = sse_payload(1_000);

    c.bench_function("sse_decode_1000_frames_single_buffer", |b| {
        b.iter(|| {
            let mut decoder = SseDecoder::new();
            let events = decoder.feed(black_box(&payload));
            black_box(events)
        });
    });
}

fn bench_decode_small_chunks(c: &mut Criterion) {
    let payload = sse_payload(1_000);

    // Network reads rarely line up with frame boundaries
    c.bench_function("sse_decode_1000_frames_37_byte_chunks", |b| {
        b.iter(|| {
            let mut decoder = SseDecoder::new();
            let mut count = 0;
            for chunk in payload.chunks(37) {
                if let Ok(events) = decoder.feed(black_box(chunk)) {
                    count += events.len();
                }
            }
            count += decoder.finish().len();
            black_box(count)
        });
    });
}

criterion_group!(benches, bench_decode_single_buffer, bench_decode_small_chunks);
criterion_main!(benches);
