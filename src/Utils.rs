//! different utility modules used throughout the project
/// tiny module to set up logging and save plot samples and scan results into csv files
pub mod logger;
/// tiny module to draw a plot sample with its discontinuities into a png file
pub mod plots;
/// pretty-printing of steps, verification probes and discontinuities as tables
pub mod report;
/// parse document with structure like " title1 key1: value1, value2 key2: value2 title2 key3:value3, value4" into HashMap
pub mod task_parser;
///
mod task_parser_tests;
