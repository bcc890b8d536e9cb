#![allow(dead_code)]

pub mod mongo;
