// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hxclient::Headers;

const RAW: &str = "Content-Type: application/json\r\n\
Content-Length: 348\r\n\
Cache-Control: no-cache\r\n\
Set-Cookie: a=1; Path=/\r\n\
Set-Cookie: b=2; Path=/\r\n\
Vary: Accept-Encoding\r\n\
X-Request-Id: 5f1c2a\r\n";

fn rebuild_without_read(c: &mut Criterion) {
    c.bench_function("headers_fork_chain_unread", |b| {
        b.iter(|| {
            let headers = Headers::parse(black_box(RAW))
                .set("Authorization", "Bearer token")
                .append("Accept", "application/json")
                .set("X-XSRF-TOKEN", "abc")
                .delete("Cache-Control", None);
            black_box(headers)
        })
    });
}

fn rebuild_then_read(c: &mut Criterion) {
    c.bench_function("headers_fork_chain_first_read", |b| {
        b.iter(|| {
            let headers = Headers::parse(black_box(RAW))
                .set("Authorization", "Bearer token")
                .append("Accept", "application/json")
                .set("X-XSRF-TOKEN", "abc")
                .delete("Cache-Control", None);
            black_box(headers.get("authorization").map(str::len))
        })
    });
}

criterion_group!(benches, rebuild_without_read, rebuild_then_read);
criterion_main!(benches);
