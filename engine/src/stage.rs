use std::sync::Arc;

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use rayon::iter::{
    IndexedParallelIterator, IntoParallelIterator, IntoParallelRefMutIterator, ParallelIterator,
};

use config::{DEFAULT_CHUNK_SIZE, PRODUCT_BUFFER_INIT_CAPACITY, SpeciesQedConfig};
use pairs::{MultiphotonBreitWheeler, PairStats, refresh_photon_chi};
use radiation::{RadiationModel, RadiationStats};
use species::{FieldView, ParticleBlock, ProductBuffer, remove_decayed};
use tables::{PairTables, RadiationTables};

use crate::Result;

/// Reduced outcome of one stage call.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageReport {
    pub radiation: RadiationStats,
    pub pairs: PairStats,
    /// Decayed photons compacted out of the source species.
    pub photons_removed: usize,
}

/// The QED stage of one species, fixed at construction.
///
/// Owns the per-worker random streams and staging buffers; the tables are
/// shared read-only handles. One call per (patch, species, timestep).
pub struct QedStage {
    model: RadiationModel,
    breit_wheeler: Option<MultiphotonBreitWheeler>,
    radiation_tables: Option<Arc<RadiationTables>>,
    pair_tables: Option<Arc<PairTables>>,
    inv_norm_schwinger: f64,
    ndim: usize,
    chunk_size: usize,
    root_seed: u64,
    streams: Vec<Pcg64Mcg>,
    photon_buffers: Vec<ProductBuffer>,
    electron_buffers: Vec<ProductBuffer>,
    positron_buffers: Vec<ProductBuffer>,
}

impl QedStage {
    /// Builds the stage for one species.
    ///
    /// Fails when the settings are inconsistent or when a Monte-Carlo
    /// process is enabled without its tables.
    pub fn new(
        config: &SpeciesQedConfig,
        radiation_tables: Option<Arc<RadiationTables>>,
        pair_tables: Option<Arc<PairTables>>,
        ndim: usize,
        root_seed: u64,
    ) -> Result<Self> {
        let model = RadiationModel::build(config, radiation_tables.is_some())?;
        let breit_wheeler = config
            .multiphoton_bw
            .then(|| MultiphotonBreitWheeler::build(config, pair_tables.is_some()))
            .transpose()?;
        // Surfaces an invalid dimensionality before any buffer is needed.
        ProductBuffer::new(ndim)?;

        Ok(Self {
            model,
            breit_wheeler,
            radiation_tables,
            pair_tables,
            inv_norm_schwinger: config.inv_norm_schwinger_field(),
            ndim,
            chunk_size: DEFAULT_CHUNK_SIZE,
            root_seed,
            streams: Vec::new(),
            photon_buffers: Vec::new(),
            electron_buffers: Vec::new(),
            positron_buffers: Vec::new(),
        })
    }

    /// Overrides the per-worker range size. Mostly useful to pin down the
    /// range partition in reproducibility tests.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Runs the radiation model over a lepton block.
    ///
    /// `epart`/`bpart` are the interpolated fields in the host layout, with
    /// the field of particle `i` at offset `i - ipart_ref`. Emitted
    /// macro-photons are appended to `photon_target` when one is given;
    /// otherwise their energy is accounted in the radiated-energy scalar.
    pub fn run_radiation(
        &mut self,
        block: &mut ParticleBlock,
        epart: &[f64],
        bpart: &[f64],
        ipart_ref: usize,
        photon_target: Option<&mut ParticleBlock>,
    ) -> Result<StageReport> {
        let mut report = StageReport::default();
        if block.is_empty() || self.model.is_none() || self.radiation_tables.is_none() {
            return Ok(report);
        }
        let fields = FieldView::new(epart, bpart, ipart_ref)?;

        let ranges = block.split_ranges_mut(self.chunk_size);
        let workers = ranges.len();
        self.ensure_workers(workers)?;

        let Some(tables) = self.radiation_tables.as_deref() else {
            return Ok(report);
        };
        let store_photons = photon_target.is_some();
        let model = &self.model;
        let stats: Vec<RadiationStats> = ranges
            .into_par_iter()
            .zip(self.streams[..workers].par_iter_mut())
            .zip(self.photon_buffers[..workers].par_iter_mut())
            .map(|((mut range, rng), buffer)| {
                let photons = store_photons.then_some(buffer);
                model.apply(&mut range, &fields, tables, photons, rng)
            })
            .collect();
        for s in &stats {
            report.radiation.merge(s);
        }

        if let Some(target) = photon_target {
            for buffer in &mut self.photon_buffers[..workers] {
                buffer.flush_into(target)?;
            }
        }
        Ok(report)
    }

    /// Runs the Breit-Wheeler process over a photon block.
    ///
    /// Created pairs are appended to the lepton targets when given; the
    /// converted energy is accounted either way. Decayed photons are
    /// compacted out at the end of the call and the bin bounds
    /// `bmin`/`bmax` are rewritten to the surviving counts.
    #[allow(clippy::too_many_arguments)]
    pub fn run_breit_wheeler(
        &mut self,
        photons: &mut ParticleBlock,
        epart: &[f64],
        bpart: &[f64],
        ipart_ref: usize,
        electron_target: Option<&mut ParticleBlock>,
        positron_target: Option<&mut ParticleBlock>,
        bmin: &mut [usize],
        bmax: &mut [usize],
    ) -> Result<StageReport> {
        let mut report = StageReport::default();
        if photons.is_empty() || self.breit_wheeler.is_none() || self.pair_tables.is_none() {
            return Ok(report);
        }
        let fields = FieldView::new(epart, bpart, ipart_ref)?;

        let ranges = photons.split_ranges_mut(self.chunk_size);
        let workers = ranges.len();
        self.ensure_workers(workers)?;

        let (Some(breit_wheeler), Some(tables)) =
            (&self.breit_wheeler, self.pair_tables.as_deref())
        else {
            return Ok(report);
        };
        let store_electrons = electron_target.is_some();
        let store_positrons = positron_target.is_some();
        let inv_norm_schwinger = self.inv_norm_schwinger;
        let stats: Vec<PairStats> = ranges
            .into_par_iter()
            .zip(self.streams[..workers].par_iter_mut())
            .zip(self.electron_buffers[..workers].par_iter_mut())
            .zip(self.positron_buffers[..workers].par_iter_mut())
            .map(|(((mut range, rng), electron_buffer), positron_buffer)| {
                let stats = breit_wheeler.apply(
                    &mut range,
                    &fields,
                    tables,
                    store_electrons.then_some(electron_buffer),
                    store_positrons.then_some(positron_buffer),
                    rng,
                );
                refresh_photon_chi(&mut range, &fields, inv_norm_schwinger);
                stats
            })
            .collect();
        for s in &stats {
            report.pairs.merge(s);
        }

        if let Some(target) = electron_target {
            for buffer in &mut self.electron_buffers[..workers] {
                buffer.flush_into(target)?;
            }
        }
        if let Some(target) = positron_target {
            for buffer in &mut self.positron_buffers[..workers] {
                buffer.flush_into(target)?;
            }
        }

        report.photons_removed = remove_decayed(photons, bmin, bmax)?;
        Ok(report)
    }

    /// Out-of-range table lookups clamped since construction, across both
    /// table sets. Worth reporting once per run, never per particle.
    pub fn table_clamp_events(&self) -> u64 {
        self.radiation_tables
            .as_deref()
            .map_or(0, RadiationTables::clamp_events)
            + self.pair_tables.as_deref().map_or(0, PairTables::clamp_events)
    }

    /// Grows the per-worker random streams and staging buffers.
    ///
    /// Stream `k` is seeded from the root seed and its own index only, so a
    /// fixed range partition reproduces bit-identical results regardless of
    /// how rayon schedules the ranges.
    fn ensure_workers(&mut self, workers: usize) -> Result<()> {
        while self.streams.len() < workers {
            let index = self.streams.len() as u64;
            self.streams.push(Pcg64Mcg::seed_from_u64(
                self.root_seed ^ (index + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15),
            ));
        }
        while self.photon_buffers.len() < workers {
            self.photon_buffers
                .push(ProductBuffer::with_capacity(self.ndim, PRODUCT_BUFFER_INIT_CAPACITY)?);
            self.electron_buffers
                .push(ProductBuffer::with_capacity(self.ndim, PRODUCT_BUFFER_INIT_CAPACITY)?);
            self.positron_buffers
                .push(ProductBuffer::with_capacity(self.ndim, PRODUCT_BUFFER_INIT_CAPACITY)?);
        }
        Ok(())
    }
}
