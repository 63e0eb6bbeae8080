mod block;
mod galois;

pub(crate) use block::*;
pub use galois::{poly_mul, poly_rem, G};

use std::sync::OnceLock;

// Reed-Solomon encoder
//------------------------------------------------------------------------------

// Product of (x - α^i) for i in [0, degree)
pub fn generator_polynomial(degree: usize) -> Vec<u8> {
    (0..degree).fold(vec![1], |gen, i| poly_mul(&gen, &[1, G::gen_pow(i).into()]))
}

// Generator polynomials for every block ecc length, built on first use
fn cached_generator(degree: usize) -> &'static [u8] {
    static GENERATOR_POLYNOMIALS: OnceLock<Vec<Vec<u8>>> = OnceLock::new();

    let gens = GENERATOR_POLYNOMIALS
        .get_or_init(|| (0..=MAX_EC_SIZE).map(generator_polynomial).collect());
    &gens[degree]
}

// Divides the data polynomial, shifted up by the generator degree, by the
// generator; the remainder's coefficients are the ecc
pub fn compute_remainder(data: &[u8], generator: &[u8]) -> Vec<u8> {
    let ecc_count = generator.len() - 1;
    let mut dividend = Vec::with_capacity(data.len() + ecc_count);
    dividend.extend_from_slice(data);
    dividend.resize(data.len() + ecc_count, 0);
    poly_rem(&dividend, generator)
}

// ECC: Error Correction Codeword generator
pub fn ecc(block: &[u8], ecc_count: usize) -> Vec<u8> {
    if ecc_count > MAX_EC_SIZE {
        return compute_remainder(block, &generator_polynomial(ecc_count));
    }
    compute_remainder(block, cached_generator(ecc_count))
}


// Global constants
//------------------------------------------------------------------------------

pub static MAX_EC_SIZE: usize = 30;
