// src/selector/hash.rs
//! 32-bit FNV-1a over a gateway-address token.
//!
//! Routing stability across deployments depends on this being bit-exact, so
//! it is written out here rather than pulled from a 64-bit hasher.

const OFFSET_BASIS: u32 = 0x811c_9dc5;
const PRIME: u32 = 0x0100_0193;

pub fn fnv1a_32(token: &[u8]) -> u32 {
    token.iter().fold(OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(PRIME)
    })
}
