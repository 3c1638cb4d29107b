//! The injected sampling primitive and its standard implementations.
//!
//! Purpose
//! -------
//! Effects draw latent quantities by name through the [`Sampler`] trait; the
//! enclosing inference loop decides what a draw means (a fresh prior sample,
//! a posterior particle, a fixed mock). The framework itself only routes
//! names: the broadcasting engine wraps the caller's sampler in a
//! [`ScopedSampler`] so each replica draws under its own
//! `effect/series/column` scope and replicas never share latent sites.
//!
//! Key behaviors
//! -------------
//! - [`SeedSampler`] draws from the prior with a seeded RNG and memoizes by
//!   site name: within one pass, the same site always yields the same value.
//! - [`FixedSampler`] returns a constant and records the sites it served, in
//!   first-request order; conformance tests assert replica scoping through
//!   it.
//! - [`ScopedSampler`] prefixes every site with a scope and `/`; effect
//!   authors write plain site names and never see scoping.
//!
//! Conventions
//! -----------
//! - Site names are `/`-separated paths; the scope segments are therefore
//!   `/`-free: effect names at registration, series ids and column names at
//!   frame construction.
//! - Create a fresh sampler, or clear the seeded sampler, per prediction
//!   pass; memoization is per sampler lifetime, not per pass.
use crate::sampling::{errors::PriorResult, prior::Prior};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// Source of latent draws, injected into every `predict` call.
pub trait Sampler {
    /// Draw the value for the named site under the given prior.
    fn sample(&mut self, site: &str, prior: &Prior) -> PriorResult<f64>;
}

/// Sampler drawing fresh prior samples from a seeded RNG, memoized by site.
///
/// Repeated requests for the same site return the first draw, so an effect
/// that samples a site in `transform`-adjacent helpers and again in `predict`
/// sees one consistent value per pass.
#[derive(Debug, Clone)]
pub struct SeedSampler {
    rng: StdRng,
    draws: BTreeMap<String, f64>,
}

impl SeedSampler {
    /// Sampler seeded with `seed`; identical seeds replay identical draws.
    pub fn new(seed: u64) -> SeedSampler {
        SeedSampler { rng: StdRng::seed_from_u64(seed), draws: BTreeMap::new() }
    }

    /// Sites drawn so far with their values, ordered by site name.
    pub fn draws(&self) -> &BTreeMap<String, f64> {
        &self.draws
    }

    /// Forget memoized draws; the RNG stream continues. Call between passes
    /// when each pass should resample.
    pub fn clear(&mut self) {
        self.draws.clear();
    }
}

impl Sampler for SeedSampler {
    fn sample(&mut self, site: &str, prior: &Prior) -> PriorResult<f64> {
        if let Some(&value) = self.draws.get(site) {
            return Ok(value);
        }
        let value = prior.draw(&mut self.rng)?;
        self.draws.insert(site.to_string(), value);
        Ok(value)
    }
}

/// Sampler returning one constant for every site; records served sites.
///
/// The deterministic workhorse of the conformance tests: mock the draw to
/// `0.0` and a contribution becomes a closed-form function of its inputs.
#[derive(Debug, Clone)]
pub struct FixedSampler {
    value: f64,
    sites: Vec<String>,
}

impl FixedSampler {
    /// Sampler that answers every site with `value`.
    pub fn new(value: f64) -> FixedSampler {
        FixedSampler { value, sites: Vec::new() }
    }

    /// Distinct sites served, in first-request order.
    pub fn sites(&self) -> &[String] {
        &self.sites
    }
}

impl Sampler for FixedSampler {
    fn sample(&mut self, site: &str, _prior: &Prior) -> PriorResult<f64> {
        if !self.sites.iter().any(|known| known == site) {
            self.sites.push(site.to_string());
        }
        Ok(self.value)
    }
}

/// Sampler adapter prefixing every site with `scope/`.
///
/// Built by the broadcasting engine per replica; nests naturally if an effect
/// delegates to sub-components with scopes of their own.
pub struct ScopedSampler<'a> {
    scope: String,
    inner: &'a mut dyn Sampler,
}

impl<'a> ScopedSampler<'a> {
    /// Wrap `inner` so every site is drawn under `scope`.
    pub fn new(inner: &'a mut dyn Sampler, scope: impl Into<String>) -> ScopedSampler<'a> {
        ScopedSampler { scope: scope.into(), inner }
    }
}

impl Sampler for ScopedSampler<'_> {
    fn sample(&mut self, site: &str, prior: &Prior) -> PriorResult<f64> {
        let scoped = format!("{}/{}", self.scope, site);
        self.inner.sample(&scoped, prior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Site memoization and seed reproducibility of `SeedSampler`.
    // - Constant answers and site recording of `FixedSampler`.
    // - Scope prefixing (including nesting) of `ScopedSampler`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Verify that the seeded sampler memoizes per site and replays under the
    // same seed.
    //
    // Given
    // -----
    // - Two `SeedSampler::new(42)` instances and a standard normal prior.
    //
    // Expect
    // ------
    // - The same site drawn twice yields one value.
    // - Distinct sites yield distinct values.
    // - A second sampler with the same seed replays the first draw.
    fn seed_sampler_memoizes_sites_and_replays_seeds() {
        let prior = Prior::standard_normal();
        let mut sampler = SeedSampler::new(42);
        let mut replay = SeedSampler::new(42);

        let first = sampler.sample("trend/slope", &prior).unwrap();
        let again = sampler.sample("trend/slope", &prior).unwrap();
        let other = sampler.sample("trend/level", &prior).unwrap();
        let replayed = replay.sample("trend/slope", &prior).unwrap();

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(first, replayed);
        assert_eq!(sampler.draws().len(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Verify that clearing the seeded sampler forgets memoized sites while
    // the RNG stream continues.
    //
    // Given
    // -----
    // - A seeded sampler with one memoized site, then `clear`.
    //
    // Expect
    // ------
    // - The site resamples to a new value after clearing.
    fn seed_sampler_clear_resamples_sites() {
        let prior = Prior::standard_normal();
        let mut sampler = SeedSampler::new(3);

        let before = sampler.sample("coef", &prior).unwrap();
        sampler.clear();
        let after = sampler.sample("coef", &prior).unwrap();

        assert_ne!(before, after);
        assert_eq!(sampler.draws().len(), 1);
    }

    #[test]
    // Purpose
    // -------
    // Verify the fixed sampler's constant answers and site recording.
    //
    // Given
    // -----
    // - A `FixedSampler::new(0.0)` serving two sites, one twice.
    //
    // Expect
    // ------
    // - Every answer is 0.0; the site list holds each site once, in
    //   first-request order.
    fn fixed_sampler_returns_constant_and_records_sites() {
        let prior = Prior::standard_normal();
        let mut sampler = FixedSampler::new(0.0);

        let a = sampler.sample("offset", &prior).unwrap();
        let b = sampler.sample("coef", &prior).unwrap();
        let c = sampler.sample("offset", &prior).unwrap();

        assert_eq!((a, b, c), (0.0, 0.0, 0.0));
        assert_eq!(sampler.sites(), &["offset".to_string(), "coef".to_string()]);
    }

    #[test]
    // Purpose
    // -------
    // Verify scope prefixing, including nested scopes.
    //
    // Given
    // -----
    // - A fixed sampler wrapped in scope "seasonal/store_a", then the wrapper
    //   wrapped again in scope "weekly".
    //
    // Expect
    // ------
    // - The inner sampler records the fully qualified site
    //   "seasonal/store_a/weekly/coef".
    fn scoped_sampler_prefixes_and_nests() {
        let prior = Prior::standard_normal();
        let mut base = FixedSampler::new(1.5);
        {
            let mut outer = ScopedSampler::new(&mut base, "seasonal/store_a");
            let mut inner = ScopedSampler::new(&mut outer, "weekly");

            let drawn = inner.sample("coef", &prior).unwrap();
            assert_eq!(drawn, 1.5);
        }

        assert_eq!(base.sites(), &["seasonal/store_a/weekly/coef".to_string()]);
    }
}
