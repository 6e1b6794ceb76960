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

//! Schema documents for each built-in generation.

use crate::version::SchemaVersion;
use serde_json::{json, Value};

/// JSON Schema dialect declared by every document.
pub const JSON_SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// Processing status values accepted by v1.1 and later.
pub const STATUS_VALUES: [&str; 4] = ["success", "partial", "failed", "skipped"];

/// `$id` for a schema version.
pub fn schema_id(version: &str) -> String {
    format!("build-report-schema-v{}.json", version)
}

/// Title for a schema version.
pub fn schema_title(version: &str) -> String {
    format!("Build Report Schema v{}", version)
}

/// Build the schema document for a built-in generation.
pub fn schema_document(version: SchemaVersion) -> Value {
    match version {
        SchemaVersion::V1_0 => v1_0(),
        SchemaVersion::V1_1 => v1_1(),
        SchemaVersion::V2_0 => v2_0(),
    }
}

fn v1_0() -> Value {
    json!({
        "$schema": JSON_SCHEMA_DIALECT,
        "$id": schema_id("1.0"),
        "title": schema_title("1.0"),
        "description": "Schema for build report summary files",
        "type": "object",
        "required": ["generation_info", "results", "summary_by_benchmark"],
        "properties": {
            "schema_version": {"type": "string", "const": "1.0"},
            "generation_info": {
                "type": "object",
                "required": ["total_results", "timestamp"],
                "properties": {
                    "total_results": {"type": "integer", "minimum": 0},
                    "timestamp": {"type": "string", "format": "date-time"},
                    "benchmarks": {"type": "array", "items": {"type": "string"}},
                    "root_directory": {"type": "string"},
                    "file_pattern": {"type": "string"}
                }
            },
            "results": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["file_path", "benchmark"],
                    "properties": {
                        "file_path": {"type": "string"},
                        "benchmark": {"type": "string"},
                        "run_id": {"type": "string"},
                        "file_size": {"type": "integer"},
                        "file_modified": {"type": "number"}
                    },
                    "additionalProperties": true
                }
            },
            "summary_by_benchmark": {
                "type": "object",
                "patternProperties": {
                    ".*": {
                        "type": "object",
                        "required": ["count", "files"],
                        "properties": {
                            "count": {"type": "integer", "minimum": 0},
                            "files": {"type": "array", "items": {"type": "string"}}
                        }
                    }
                }
            }
        }
    })
}

fn v1_1() -> Value {
    let mut schema = v1_0();
    schema["$id"] = json!(schema_id("1.1"));
    schema["title"] = json!(schema_title("1.1"));
    schema["properties"]["schema_version"] = json!({"type": "string", "const": "1.1"});
    schema["properties"]["benchmark_definitions"] = json!({
        "type": "object",
        "description": "Definitions of expected fields per benchmark",
        "patternProperties": {
            ".*": {
                "type": "object",
                "properties": {
                    "required_fields": {"type": "array", "items": {"type": "string"}},
                    "optional_fields": {"type": "array", "items": {"type": "string"}},
                    "field_types": {"type": "object"}
                }
            }
        }
    });
    schema["properties"]["processing_metadata"] = json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "transformation_time": {"type": "string", "format": "date-time"},
                "processors_used": {"type": "array", "items": {"type": "string"}},
                "status": {"type": "string", "enum": STATUS_VALUES}
            }
        }
    });
    schema
}

fn v2_0() -> Value {
    json!({
        "$schema": JSON_SCHEMA_DIALECT,
        "$id": schema_id("2.0"),
        "title": schema_title("2.0"),
        "description": "Advanced schema with extensible benchmark definitions",
        "type": "object",
        "required": ["schema_info", "generation_info", "results", "summary_by_benchmark"],
        "properties": {
            "schema_info": {
                "type": "object",
                "required": ["version", "description"],
                "properties": {
                    "version": {"type": "string", "const": "2.0"},
                    "description": {"type": "string"},
                    "created_date": {"type": "string", "format": "date"},
                    "last_modified": {"type": "string", "format": "date"}
                }
            },
            "generation_info": {
                "type": "object",
                "required": ["total_results", "successful_results", "timestamp"],
                "properties": {
                    "total_results": {"type": "integer", "minimum": 0},
                    "successful_results": {"type": "integer", "minimum": 0},
                    "failed_results": {"type": "integer", "minimum": 0},
                    "timestamp": {"type": "string", "format": "date-time"},
                    "benchmarks": {"type": "array", "items": {"type": "string"}},
                    "root_directory": {"type": "string"},
                    "file_pattern": {"type": "string"},
                    "processing_duration_seconds": {"type": "number", "minimum": 0}
                }
            },
            "benchmark_definitions": {
                "type": "object",
                "description": "Schema definitions for each benchmark type",
                "patternProperties": {
                    ".*": {
                        "type": "object",
                        "properties": {
                            "description": {"type": "string"},
                            "required_fields": {"type": "array", "items": {"type": "string"}},
                            "optional_fields": {"type": "array", "items": {"type": "string"}},
                            "field_schemas": {"type": "object"},
                            "result_format": {
                                "type": "string",
                                "enum": ["simple", "structured", "time_series"]
                            },
                            "validation_rules": {"type": "array", "items": {"type": "string"}}
                        }
                    }
                }
            },
            "results": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["file_path", "benchmark", "processing_status"],
                    "properties": {
                        "file_path": {"type": "string"},
                        "benchmark": {"type": "string"},
                        "processing_status": {"type": "string", "enum": STATUS_VALUES},
                        "run_id": {"type": "string"},
                        "iterations": {"type": "array", "items": {"type": "object"}},
                        "file_metadata": {
                            "type": "object",
                            "properties": {
                                "size_bytes": {"type": "integer", "minimum": 0},
                                "modified_timestamp": {"type": "number"},
                                "encoding": {"type": "string"},
                                "line_count": {"type": "integer"}
                            }
                        },
                        "extraction_metadata": {
                            "type": "object",
                            "properties": {
                                "rules_applied": {"type": "array", "items": {"type": "string"}},
                                "fields_extracted": {"type": "integer", "minimum": 0},
                                "extraction_duration_ms": {"type": "number"}
                            }
                        }
                    },
                    "additionalProperties": true
                }
            },
            "summary_by_benchmark": {
                "type": "object",
                "patternProperties": {
                    ".*": {
                        "type": "object",
                        "required": ["count", "files", "success_rate"],
                        "properties": {
                            "count": {"type": "integer", "minimum": 0},
                            "successful_count": {"type": "integer", "minimum": 0},
                            "failed_count": {"type": "integer", "minimum": 0},
                            "success_rate": {"type": "number", "minimum": 0, "maximum": 1},
                            "files": {"type": "array", "items": {"type": "string"}},
                            "avg_processing_time_ms": {"type": "number", "minimum": 0},
                            "field_coverage": {"type": "object"}
                        }
                    }
                }
            },
            "validation_report": {
                "type": "object",
                "properties": {
                    "schema_validation": {"type": "boolean"},
                    "validation_errors": {"type": "array", "items": {"type": "string"}},
                    "validation_warnings": {"type": "array", "items": {"type": "string"}},
                    "data_quality_score": {"type": "number", "minimum": 0, "maximum": 1}
                }
            }
        }
    })
}

/// Field schema for a trafficgen summary result.
fn trafficgen_result_schema() -> Value {
    json!({
        "type": "object",
        "required": ["type", "mean"],
        "properties": {
            "type": {"type": "string", "description": "Type of measurement (e.g., rx-pps, tx-pps)"},
            "samples": {"type": "number", "minimum": 0},
            "mean": {"type": "number", "minimum": 0},
            "min": {"type": "number", "minimum": 0},
            "max": {"type": "number", "minimum": 0},
            "stddev": {"type": ["number", "null"], "minimum": 0}
        }
    })
}

/// Hand-written definitions for well-known benchmarks, keyed by name.
pub fn builtin_benchmark_definitions() -> Value {
    json!({
        "trafficgen": {
            "description": "Network traffic generation benchmark",
            "required_fields": ["file_path", "benchmark", "run-id", "result"],
            "optional_fields": ["period_length", "tags", "iteration-id", "sample-id", "period_range"],
            "field_schemas": {
                "result": trafficgen_result_schema(),
                "period_length": {
                    "type": "string",
                    "pattern": r"^[0-9.]+\s*(seconds?|s|ms|milliseconds?)$"
                },
                "run-id": {
                    "type": "string",
                    "pattern": r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$"
                }
            },
            "result_format": "structured",
            "validation_rules": [
                "result.mean > 0",
                "result.min <= result.mean <= result.max"
            ]
        },
        "iperf": {
            "description": "Network performance testing with iPerf",
            "required_fields": ["file_path", "benchmark", "bandwidth"],
            "optional_fields": ["duration", "protocol", "parallel_streams"],
            "field_schemas": {
                "bandwidth": {
                    "type": "object",
                    "properties": {
                        "value": {"type": "number", "minimum": 0},
                        "unit": {"type": "string", "enum": ["bps", "Kbps", "Mbps", "Gbps"]}
                    }
                }
            },
            "result_format": "structured"
        },
        "fio": {
            "description": "Storage I/O performance testing",
            "required_fields": ["file_path", "benchmark", "iops"],
            "optional_fields": ["bandwidth", "latency", "block_size"],
            "field_schemas": {
                "iops": {"type": "number", "minimum": 0},
                "latency": {
                    "type": "object",
                    "properties": {
                        "mean": {"type": "number", "minimum": 0},
                        "p95": {"type": "number", "minimum": 0},
                        "p99": {"type": "number", "minimum": 0}
                    }
                }
            },
            "result_format": "structured"
        }
    })
}
