// Galois field element of GF(256) under x^8 + x^4 + x^3 + x^2 + 1
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct G(pub u8);

impl G {
    // α^i
    pub fn gen_pow(i: usize) -> Self {
        G(EXP_TABLE[i % 255])
    }
}

impl From<G> for u8 {
    fn from(g: G) -> Self {
        g.0
    }
}

pub fn multiply(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_sum = LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize;
    EXP_TABLE[log_sum % 255]
}

// Polynomial arithmetic
// Coefficients are stored from the highest degree term down
//------------------------------------------------------------------------------

pub fn poly_mul(lhs: &[u8], rhs: &[u8]) -> Vec<u8> {
    if lhs.is_empty() || rhs.is_empty() {
        return Vec::new();
    }
    let mut res = vec![0u8; lhs.len() + rhs.len() - 1];
    for (i, &a) in lhs.iter().enumerate() {
        if a == 0 {
            continue;
        }
        for (j, &b) in rhs.iter().enumerate() {
            res[i + j] ^= multiply(a, b);
        }
    }
    res
}

// Remainder of dividend / divisor, where divisor is monic.
// Result always has divisor.len() - 1 coefficients.
pub fn poly_rem(dividend: &[u8], divisor: &[u8]) -> Vec<u8> {
    debug_assert!(divisor.first() == Some(&1), "Divisor must be monic");

    let deg = divisor.len() - 1;
    if dividend.len() < divisor.len() {
        let mut res = vec![0u8; deg - dividend.len()];
        res.extend_from_slice(dividend);
        return res;
    }

    let steps = dividend.len() - deg;
    let mut res = dividend.to_vec();
    for i in 0..steps {
        let lead_coeff = res[i];
        if lead_coeff == 0 {
            continue;
        }
        for (u, &v) in res[i + 1..].iter_mut().zip(divisor[1..].iter()) {
            *u ^= multiply(v, lead_coeff);
        }
    }
    res.split_off(steps)
}


// Global constants
//------------------------------------------------------------------------------

const PRIMITIVE_POLY: u16 = 0x11D;

pub static EXP_TABLE: [u8; 256] = build_exp_table();

pub static LOG_TABLE: [u8; 256] = build_log_table();

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 256 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLY;
        }
        i += 1;
    }
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}
