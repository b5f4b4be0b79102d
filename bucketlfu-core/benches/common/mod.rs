//! Key generators for the throughput benchmarks.

/// Zipf sampler over `[0, imax]` with `P(k)` proportional to `(v + k)^-s`.
///
/// Rejection-inversion sampling (Hörmann and Derflinger). Requires `s > 1`
/// and `v >= 1`.
pub struct Zipf {
    rng: fastrand::Rng,
    imax: f64,
    v: f64,
    q: f64,
    s: f64,
    one_minus_q: f64,
    one_minus_q_inv: f64,
    hxm: f64,
    hx0_minus_hxm: f64,
}

impl Zipf {
    pub fn new(rng: fastrand::Rng, s: f64, v: f64, imax: u64) -> Self {
        assert!(s > 1.0 && v >= 1.0, "zipf needs s > 1 and v >= 1");

        let one_minus_q = 1.0 - s;
        let mut z = Self {
            rng,
            imax: imax as f64,
            v,
            q: s,
            s: 0.0,
            one_minus_q,
            one_minus_q_inv: 1.0 / one_minus_q,
            hxm: 0.0,
            hx0_minus_hxm: 0.0,
        };
        z.hxm = z.h(z.imax + 0.5);
        z.hx0_minus_hxm = z.h(0.5) - (z.v.ln() * -z.q).exp() - z.hxm;
        z.s = 1.0 - z.hinv(z.h(1.5) - (-z.q * (z.v + 1.0).ln()).exp());
        z
    }

    fn h(&self, x: f64) -> f64 {
        (self.one_minus_q * (self.v + x).ln()).exp() * self.one_minus_q_inv
    }

    fn hinv(&self, x: f64) -> f64 {
        (self.one_minus_q_inv * (self.one_minus_q * x).ln()).exp() - self.v
    }

    pub fn next_u64(&mut self) -> u64 {
        loop {
            let r = self.rng.f64();
            let ur = self.hxm + r * self.hx0_minus_hxm;
            let x = self.hinv(ur);
            let k = (x + 0.5).floor();
            if k - x <= self.s {
                return k as u64;
            }
            if ur >= self.h(k + 0.5) - (-(k + self.v).ln() * self.q).exp() {
                return k as u64;
            }
        }
    }
}

/// Pre-draws `len` keys so sampling cost stays out of the measured loop.
pub fn zipf_keys(seed: u64, len: usize) -> Vec<u64> {
    let mut zipf = Zipf::new(fastrand::Rng::with_seed(seed), 1.0001, 10.0, len as u64);
    (0..len).map(|_| zipf.next_u64()).collect()
}
