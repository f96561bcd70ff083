use criterion::{criterion_group, criterion_main};

mod network;

criterion_group!(
    benches,
    network::application::http::client::bench_encode_head,
    network::application::http::client::bench_content_length_response,
    network::application::http::client::bench_chunked_response
);
criterion_main!(benches);
