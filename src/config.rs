//! Mechanism for loading the analysis configuration

use crate::{evgen::GeneratorSettings, numeric::Float, selection::SelectionCuts, Result};

use eyre::{bail, ensure, eyre, WrapErr};
use log::{info, warn};

use std::{collections::HashSet, fs, str::FromStr};

/// Prefix of the configuration keys which map to selection cuts
const CUT_PREFIX: &str = "cut.";

/// Analysis run configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    /// Number of events to be generated and analyzed
    pub num_events: usize,

    /// Seed of the random number generator
    pub seed: u64,

    /// Parameters of the toy event generator
    pub generator: GeneratorSettings,

    /// Thresholds of the event selection
    pub selection: SelectionCuts,
}
//
impl Default for Configuration {
    fn default() -> Self {
        Self {
            num_events: 10_000,
            seed: 42,
            generator: GeneratorSettings::default(),
            selection: SelectionCuts::default(),
        }
    }
}
//
impl Configuration {
    /// Load the configuration from a file, check it, and log it
    pub fn load(file_name: &str) -> Result<Self> {
        let config_str = fs::read_to_string(file_name)
            .wrap_err_with(|| format!("Could not read configuration file {}", file_name))?;
        let config = Self::parse(&config_str)?;
        info!("Loaded configuration from {}", file_name);
        config.log();
        Ok(config)
    }

    /// Decode a configuration, starting from the defaults
    ///
    /// Each non-blank line holds a `key value` pair, and anything after a `#`
    /// is a comment. Keys which are not mentioned keep their default value.
    ///
    pub fn parse(config_str: &str) -> Result<Self> {
        let mut config = Self::default();
        let mut seen_keys = HashSet::new();

        for (line_idx, line) in config_str.lines().enumerate() {
            let line = line.split('#').next().unwrap_or_default();
            let mut words = line.split_whitespace();
            let Some(key) = words.next() else {
                continue;
            };
            let data = words
                .next()
                .ok_or_else(|| eyre!("Missing value for {} on line {}", key, line_idx + 1))?;
            ensure!(
                words.next().is_none(),
                "Unexpected trailing data after {} on line {}",
                key,
                line_idx + 1
            );
            if !seen_keys.insert(key) {
                warn!(
                    "Configuration key {} is set more than once, keeping the last value",
                    key
                );
            }
            config.set(ConfigItem::new(key, data))?;
        }

        ensure!(config.num_events > 0, "Please analyze at least one event");
        ensure!(
            (0. ..=1.).contains(&config.generator.missing_record_fraction),
            "missing_record_fraction must lie in [0, 1]"
        );
        let settings = &config.generator;
        for (name, value) in [
            ("mean_photons", settings.mean_photons),
            ("mean_electrons", settings.mean_electrons),
            ("mean_muons", settings.mean_muons),
            ("mean_taus", settings.mean_taus),
            ("mean_jets", settings.mean_jets),
            ("pt_scale", settings.pt_scale),
            ("met_scale", settings.met_scale),
        ] {
            ensure!(value >= 0., "{} must not be negative, got {}", name, value);
        }
        Ok(config)
    }

    /// Apply one configuration item
    fn set(&mut self, item: ConfigItem) -> Result<()> {
        if let Some(field) = item.name.strip_prefix(CUT_PREFIX) {
            return set_cut(&mut self.selection, field, item);
        }
        let settings = &mut self.generator;
        match item.name {
            "num_events" => self.num_events = item.parse()?,
            "seed" => self.seed = item.parse()?,
            "mean_photons" => settings.mean_photons = item.parse()?,
            "mean_electrons" => settings.mean_electrons = item.parse()?,
            "mean_muons" => settings.mean_muons = item.parse()?,
            "mean_taus" => settings.mean_taus = item.parse()?,
            "mean_jets" => settings.mean_jets = item.parse()?,
            "pt_scale" => settings.pt_scale = item.parse()?,
            "met_scale" => settings.met_scale = item.parse()?,
            "eflow_per_object" => settings.eflow_per_object = item.parse()?,
            "weight" => settings.weight = item.parse()?,
            "missing_record_fraction" => settings.missing_record_fraction = item.parse()?,
            other => bail!("Unknown configuration key {}", other),
        }
        Ok(())
    }

    /// Log the configuration
    pub fn log(&self) {
        let settings = &self.generator;
        info!("num_events              : {}", self.num_events);
        info!("seed                    : {}", self.seed);
        info!(
            "mean multiplicities     : {} photons, {} electrons, {} muons, {} taus, {} jets",
            settings.mean_photons,
            settings.mean_electrons,
            settings.mean_muons,
            settings.mean_taus,
            settings.mean_jets
        );
        info!("pt_scale                : {}", settings.pt_scale);
        info!("met_scale               : {}", settings.met_scale);
        info!("eflow_per_object        : {}", settings.eflow_per_object);
        info!("weight                  : {}", settings.weight);
        info!("missing_record_fraction : {}", settings.missing_record_fraction);
        info!("selection               : {:?}", self.selection);
    }
}

/// Apply a configuration item to the selection cuts
fn set_cut(cuts: &mut SelectionCuts, field: &str, item: ConfigItem) -> Result<()> {
    match field {
        "separate_muon_list" => cuts.separate_muon_list = item.parse_bool()?,
        "max_jets" => cuts.max_jets = item.parse()?,
        _ => match float_cut(cuts, field) {
            Some(value) => *value = item.parse()?,
            None => bail!("Unknown selection cut {}", item.name),
        },
    }
    Ok(())
}

/// Locate a floating-point selection cut by name
fn float_cut<'cuts>(cuts: &'cuts mut SelectionCuts, field: &str) -> Option<&'cuts mut Float> {
    let c = cuts;
    Some(match field {
        "photon_min_pt" => &mut c.photon_min_pt,
        "photon_max_abseta" => &mut c.photon_max_abseta,
        "barrel_max_abseta" => &mut c.barrel_max_abseta,
        "endcap_min_abseta" => &mut c.endcap_min_abseta,
        "photon_isolation_cone" => &mut c.photon_isolation_cone,
        "isolation_veto" => &mut c.isolation_veto,
        "barrel_isolation.photon.offset" => &mut c.barrel_isolation.photon.offset,
        "barrel_isolation.photon.slope" => &mut c.barrel_isolation.photon.slope,
        "barrel_isolation.neutral.offset" => &mut c.barrel_isolation.neutral.offset,
        "barrel_isolation.neutral.slope" => &mut c.barrel_isolation.neutral.slope,
        "barrel_isolation.charged" => &mut c.barrel_isolation.charged,
        "endcap_isolation.photon.offset" => &mut c.endcap_isolation.photon.offset,
        "endcap_isolation.photon.slope" => &mut c.endcap_isolation.photon.slope,
        "endcap_isolation.neutral.offset" => &mut c.endcap_isolation.neutral.offset,
        "endcap_isolation.neutral.slope" => &mut c.endcap_isolation.neutral.slope,
        "endcap_isolation.charged" => &mut c.endcap_isolation.charged,
        "electron.min_pt" => &mut c.electron.min_pt,
        "electron.max_abseta" => &mut c.electron.max_abseta,
        "electron.isolation_cone" => &mut c.electron.isolation_cone,
        "muon.min_pt" => &mut c.muon.min_pt,
        "muon.max_abseta" => &mut c.muon.max_abseta,
        "muon.isolation_cone" => &mut c.muon.isolation_cone,
        "lepton_max_rel_isolation" => &mut c.lepton_max_rel_isolation,
        "tau_channels_min_met" => &mut c.tau_channels_min_met,
        "lepton_tau_max_dr" => &mut c.lepton_tau_max_dr,
        "tau_min_pt" => &mut c.tau_min_pt,
        "tau_max_abseta" => &mut c.tau_max_abseta,
        "pair_tau_min_pt" => &mut c.pair_tau_min_pt,
        "pair_tau_max_dr" => &mut c.pair_tau_max_dr,
        "pair_tau_max_abseta" => &mut c.pair_tau_max_abseta,
        "ditau_min_pt_sum" => &mut c.ditau_min_pt_sum,
        "ditau_max_mass" => &mut c.ditau_max_mass,
        "leading_photon_min_pt" => &mut c.leading_photon_min_pt,
        "subleading_photon_min_pt" => &mut c.subleading_photon_min_pt,
        "diphoton_max_mass" => &mut c.diphoton_max_mass,
        "diphoton_met_min_dphi" => &mut c.diphoton_met_min_dphi,
        "jet_min_pt" => &mut c.jet_min_pt,
        "jet_met_min_dphi" => &mut c.jet_met_min_dphi,
        "jet_count_min_pt" => &mut c.jet_count_min_pt,
        "low_met_min" => &mut c.low_met_min,
        "met_boundary" => &mut c.met_boundary,
        "low_leading_ratio" => &mut c.low_leading_ratio,
        "high_leading_ratio" => &mut c.high_leading_ratio,
        "subleading_ratio" => &mut c.subleading_ratio,
        "low_diphoton_min_pt" => &mut c.low_diphoton_min_pt,
        "high_diphoton_min_pt" => &mut c.high_diphoton_min_pt,
        _ => return None,
    })
}

/// A value from the configuration file, tagged with its key for error
/// reporting purposes.
struct ConfigItem<'data> {
    name: &'data str,
    data: &'data str,
}
//
impl<'data> ConfigItem<'data> {
    /// Build a config item from a key and its raw value
    fn new(name: &'data str, data: &'data str) -> Self {
        Self { name, data }
    }

    /// Parse this data using Rust's standard parsing logic
    fn parse<T: FromStr>(&self) -> Result<T>
    where
        <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
    {
        self.data
            .parse::<T>()
            .wrap_err_with(|| format!("Could not parse configuration of {}", self.name))
    }

    /// Parse a boolean in any case, also accepting Fortran's `.true.` and
    /// `.false.`
    fn parse_bool(&self) -> Result<bool> {
        match self.data.to_lowercase().as_str() {
            ".true." | "true" => Ok(true),
            ".false." | "false" => Ok(false),
            _ => self.parse::<bool>(),
        }
    }
}
