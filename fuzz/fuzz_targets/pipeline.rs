#![no_main]

use std::io::Cursor;

use blockhash::{Algorithm, EngineConfig, Pipeline};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (u16, u8, u16, Vec<u8>)| {
    let (block_size, threads, memory_limit, data) = input;
    let block_size = block_size as usize % 1024 + 1;
    let threads = threads as usize % 8 + 1;

    let config = EngineConfig::default()
        .with_group_bytes(4096)
        .with_memory_limit(memory_limit as usize);

    for &algorithm in Algorithm::ALL {
        let hasher = algorithm.build(block_size).unwrap();
        let pipeline = Pipeline::new(hasher.clone(), config).unwrap();

        let (out, report) = pipeline
            .run(&data[..], data.len() as u64, Cursor::new(Vec::new()), threads)
            .unwrap();
        let out = out.into_inner();

        // Verify: one digest per block, the last one zero padded
        let digest_size = hasher.output_size();
        let mut expected = Vec::new();
        let mut digest = vec![0u8; digest_size];
        for block in data.chunks(block_size) {
            let mut padded = block.to_vec();
            padded.resize(block_size, 0);
            hasher.compute(&mut digest, &padded);
            expected.extend_from_slice(&digest);
        }
        assert_eq!(out, expected);
        assert_eq!(report.blocks as usize, data.len().div_ceil(block_size));

        // Verify: in-flight bytes stay within one pack of the ceiling
        let pack_bytes = pipeline.group_blocks() * block_size;
        assert!(report.peak_live_bytes <= memory_limit as usize + pack_bytes);
    }
});
