#![allow(dead_code)]

pub mod inkmark_env;
