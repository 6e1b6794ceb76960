// Regulus Report - Benchmark log reporting pipeline
//
// Copyright (c) 2025 Regulus contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Canonical result logs.
//!
//! - **uperf**: single and multi-iteration network runs
//! - **iperf**: CPU-annotated results and a custom parameter
//! - **trafficgen**: the compact summary form
//! - **edge cases**: NaN statistics, empty iterations, unmarked logs

pub mod builders;

use crate::FixtureList;

/// One uperf iteration with one sample and one Gbps result.
pub const UPERF_SINGLE: &str = "\
benchmark: uperf
run-id: 1a2b3c4d-0000-4000-8000-000000000001
tags: model=dell-r750 perf=on kernel=5.14.0-284 rcos=414.92 topo=intranode
common params: protocol=tcp duration=60
iteration-id: 0A0A0A0A-1111-2222-3333-444444444444
  unique params: nthreads=1 test-type=stream wsize=1024 rsize=1024
  sample-id: 5B5B5B5B-0000-0000-0000-000000000001
    period range: begin: 1700000000 end: 1700000060
    period length: 60.0 seconds
  result: (uperf::Gbps) samples: 9.8 9.9 10.0 mean: 9.9 min: 9.8 max: 10.0 stddev: 0.1 stddevpct: 1.0
";

/// Three uperf iterations; the second reports two results.
pub const UPERF_MULTI: &str = "\
benchmark: uperf
run-id: 3f2a1c9e-0000-4d2b-9b1a-aa00bb11cc22
tags: model=dell-r750 perf=off offload=on cpu=26 pods-per-worker=4 scale_out_factor=2 unrelated=1
common params: protocol=tcp test-type=stream
iteration-id: AAAA-0001
  unique params: nthreads=1 wsize=64
  sample-id: 00000000-0000-0000-0000-00000000000a
    period range: begin: 100 end: 160
    period length: 60.0 seconds
  result: (uperf::Gbps) samples: 4.1 4.3 mean: 4.2 min: 4.1 max: 4.3 stddev: 0.14 stddevpct: 3.3
iteration-id: BBBB-0002
  unique params: nthreads=8 wsize=16384 rsize=16384
  sample-id: 00000000-0000-0000-0000-00000000000b
    period range: begin: 200 end: 260
    period length: 60.0 seconds
  result: (uperf::Gbps) samples: 18.9 19.1 mean: 19.0 min: 18.9 max: 19.1 stddev: 0.14 stddevpct: 0.7
  result: (uperf::transactions-sec) samples: 52000 54000 mean: 53000 min: 52000 max: 54000 stddev: 1414.2 stddevpct: 2.7
iteration-id: CCCC-0003
  unique params: nthreads=32 wsize=65536
  result: (uperf::Gbps) samples: 37.5 38.5 mean: 38.0 min: 37.5 max: 38.5 stddev: 0.7 stddevpct: 1.9
";

/// Two iperf iterations with CPU figures; the second has a parameter outside
/// the known iperf set.
pub const IPERF: &str = "\
benchmark: iperf
run-id: 7e7e7e7e-1111-4111-8111-111111111111
tags: model=hpe-dl380 perf=on cpu=52
common params: protocol=udp time=30
iteration-id: 1111-AAAA
  unique params: length=1400 bitrate-range=10G max-loss-pct=0.002
  result: (iperf::rx-Gbps) samples: 9.31 9.35 mean: 9.33 min: 9.31 max: 9.35 stddev: 0.028 stddevpct: 0.3 CPU: 41.25
iteration-id: 2222-BBBB
  unique params: length=9000 passes=3
  result: (iperf::rx-Gbps) samples: 9.81 mean: 9.81 min: 9.81 max: 9.81 stddev: NaN stddevpct: NaN CPU: 12.5
";

/// A trafficgen iteration in the compact summary form.
pub const TRAFFICGEN: &str = "\
benchmark: trafficgen
run-id: 9c9c9c9c-2222-4222-8222-222222222222
tags: model=dell-r750 topo=external
common params: frame-size=64
iteration-id: FEED-0001
  unique params: rate=100 traffic-direction=bidirectional
  sample-id: 0000abcd-0000-0000-0000-000000000001
    period range: begin: 10 end: 40
    period length: 30.0 seconds
  result: (trafficgen::rx-pps) samples: 3 mean: 14880952.0 min: 14880000.0 max: 14881900.0
";

/// A result line without a known tool marker.
pub const GENERIC: &str = "\
benchmark: fio
run-id: 5d5d5d5d-3333-4333-8333-333333333333
iteration-id: F10-0001
  unique params: rw=randread bs=4k
  result: iops=152000 lat_avg=0.84ms
";

/// A log without iteration markers.
pub const LEGACY: &str = "\
benchmark: uperf
run-id: 0b0b0b0b-4444-4444-8444-444444444444
result: (uperf::Gbps) samples: 9.0 mean: 9.0 min: 9.0 max: 9.0 stddev: 0 stddevpct: 0
result: free-form throughput note
";

/// An iteration with no result lines.
pub const EMPTY_ITERATION: &str = "\
benchmark: uperf
run-id: 0c0c0c0c-5555-4555-8555-555555555555
iteration-id: DEAD-0001
  unique params: nthreads=1
";

/// A log that names no benchmark.
pub const UNLABELED: &str = "\
run-id: 0d0d0d0d-6666-4666-8666-666666666666
iteration-id: BEEF-0001
  result: (uperf::Mbps) samples: 940 mean: 940 min: 940 max: 940 stddev: 0 stddevpct: 0
";

/// Returns all fixtures as `(name, text)` pairs.
pub fn all() -> FixtureList {
    vec![
        ("uperf_single", UPERF_SINGLE),
        ("uperf_multi", UPERF_MULTI),
        ("iperf", IPERF),
        ("trafficgen", TRAFFICGEN),
        ("generic", GENERIC),
        ("legacy", LEGACY),
        ("empty_iteration", EMPTY_ITERATION),
        ("unlabeled", UNLABELED),
    ]
}
