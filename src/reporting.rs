//! # Reporting Module / 报告模块
//!
//! This module handles the presentation of comparison results.
//! It prints a colored per-phase summary to the console and can write a
//! machine-readable JSON report for downstream tooling.
//!
//! 此模块处理对比结果的展示。
//! 它在控制台打印彩色的分阶段摘要，并可以为下游工具写入机器可读的 JSON 报告。

pub mod console;
pub mod json;

// Re-export common reporting functions
pub use console::print_summary;
pub use json::write_json_report;
