use super::*;
use crate::{
    cutflow::CutFlow,
    event::McEvent,
    histogram::HistogramSet,
    numeric::reals::consts::PI,
    testing::{electron, jet, met, muon, photon, setup_logger, tau, Call, Recorder},
};

/// Event with two barrel photons back-to-back with the MET
///
/// Both photons fly at φ = 0 with η = ±0.7, so the diphoton pt is the sum of
/// the photon pts, and its mass is √(2 pt₁ pt₂ (cosh 1.4 - 1)).
///
fn diphoton_event(leading_pt: Float, subleading_pt: Float, met_pt: Float) -> RecEvent {
    RecEvent {
        photons: vec![photon(subleading_pt, -0.7, 0.), photon(leading_pt, 0.7, 0.)],
        met: met(met_pt, PI),
        ..RecEvent::default()
    }
}

fn run(selector: &EventSelector, rec: RecEvent) -> (Selection, Recorder, Recorder) {
    setup_logger();
    let (mut cuts, mut histos) = (Recorder::default(), Recorder::default());
    let selection = selector.select(&Event::new(rec, 1.), &mut cuts, &mut histos);
    (selection, cuts, histos)
}

fn assert_single_fill(histos: &Recorder, name: &str, value: Float) {
    let fills = histos.fills();
    assert_eq!(fills.len(), 1, "{fills:?}");
    assert_eq!(fills[0].0, name);
    assert!((fills[0].1 - value).abs() < 1e-9, "{fills:?}");
}

fn default_selector() -> EventSelector {
    EventSelector::new(SelectionCuts::default())
}

#[test]
fn initialize_declares_everything() {
    let (mut cuts, mut histos) = (Recorder::default(), Recorder::default());
    default_selector()
        .initialize(&mut cuts, &mut histos)
        .unwrap();

    assert_eq!(
        cuts.calls,
        vec![
            Call::AddRegion("diphoton".into()),
            Call::AddRegion("diptau".into()),
            Call::AddCut("leading_photons_pT".into()),
            Call::AddCut("diphoton_M".into()),
            Call::AddCut("azimuthal_sep".into()),
            Call::AddCut("jets_azimutal_sep".into()),
            Call::AddCut("multijet_backgrounds".into()),
            Call::AddCut("kinetic_requirements".into()),
        ]
    );
    let expected_histos: Vec<_> = ["low_pTmiss", "high_pTmiss", "eth", "uth", "thth"]
        .into_iter()
        .map(|name| Call::AddHistogram(name.into(), 20, 0., 1000.))
        .collect();
    assert_eq!(histos.calls, expected_histos);
}

#[test]
fn initialize_reports_registry_failures() {
    let selector = default_selector();
    let (mut cuts, mut histos) = (CutFlow::new(), HistogramSet::new());
    selector.initialize(&mut cuts, &mut histos).unwrap();
    assert_eq!(cuts.cuts().len(), 6);
    assert_eq!(histos.iter().count(), 5);
    // Declaring everything twice is a configuration bug
    assert!(selector.initialize(&mut cuts, &mut histos).is_err());
}

#[test]
fn incomplete_records_are_skipped_silently() {
    let selector = default_selector();
    for event in [
        Event {
            rec: None,
            mc: Some(McEvent { weight: 1. }),
        },
        Event {
            rec: Some(diphoton_event(50., 30., 60.)),
            mc: None,
        },
    ] {
        let (mut cuts, mut histos) = (Recorder::default(), Recorder::default());
        assert!(selector.execute(&event, &mut cuts, &mut histos));
        assert_eq!(
            selector.select(&event, &mut cuts, &mut histos),
            Selection::Skipped
        );
        assert!(cuts.calls.is_empty());
        assert!(histos.calls.is_empty());
    }
}

#[test]
fn event_weight_is_forwarded() {
    let selector = default_selector();
    let (mut cuts, mut histos) = (Recorder::default(), Recorder::default());
    let event = Event::new(diphoton_event(50., 30., 60.), 0.5);
    selector.execute(&event, &mut cuts, &mut histos);
    assert_eq!(cuts.calls[0], Call::BeginEvent(0.5));
    assert_eq!(histos.calls[0], Call::BeginEvent(0.5));
}

#[test]
fn low_met_signal_region() {
    // M ≈ 58.8 GeV, pT = 80 GeV, ratios ≈ 0.85 and 0.51
    let (selection, cuts, histos) = run(&default_selector(), diphoton_event(50., 30., 60.));
    assert_eq!(selection, Selection::Accepted(LOW_PT_MISS));
    assert_single_fill(&histos, LOW_PT_MISS, 60.);
    assert_eq!(
        cuts.applied_cuts(),
        vec![
            (LEADING_PHOTONS_PT, true),
            (DIPHOTON_M, true),
            (AZIMUTHAL_SEP, true),
            (MULTIJET_BACKGROUNDS, true),
        ]
    );
}

#[test]
fn high_met_signal_region() {
    // M ≈ 69.5 GeV, pT = 95 GeV, ratios ≈ 0.86 and 0.50
    let (selection, cuts, histos) = run(&default_selector(), diphoton_event(60., 35., 150.));
    assert_eq!(selection, Selection::Accepted(HIGH_PT_MISS));
    assert_single_fill(&histos, HIGH_PT_MISS, 150.);
    assert!(!cuts.applied_cuts().contains(&(KINETIC_REQUIREMENTS, false)));
}

#[test]
fn high_met_needs_harder_diphoton() {
    // The low MET diphoton does not make it with a high MET (pT = 80 < 90)
    let (selection, cuts, histos) = run(&default_selector(), diphoton_event(50., 30., 150.));
    assert_eq!(selection, Selection::Rejected(KINETIC_REQUIREMENTS));
    assert!(histos.fills().is_empty());
    assert_eq!(
        cuts.applied_cuts().last(),
        Some(&(KINETIC_REQUIREMENTS, false))
    );
}

#[test]
fn met_boundary_belongs_to_no_region() {
    for met_pt in [40., 130.] {
        let (selection, _, histos) = run(&default_selector(), diphoton_event(60., 35., met_pt));
        assert_eq!(selection, Selection::Rejected(KINETIC_REQUIREMENTS));
        assert!(histos.fills().is_empty());
    }
}

#[test]
fn single_signal_photon_fails_leading_photons_cut() {
    let mut rec = diphoton_event(50., 30., 60.);
    // Move the sub-leading photon into the barrel-endcap gap
    rec.photons[0] = photon(30., 1.5, 0.);
    let selector = default_selector();
    let (mut cuts, mut histos) = (Recorder::default(), Recorder::default());
    let event = Event::new(rec, 1.);
    assert!(selector.execute(&event, &mut cuts, &mut histos));
    assert_eq!(cuts.applied_cuts(), vec![(LEADING_PHOTONS_PT, false)]);
    assert!(histos.fills().is_empty());
}

#[test]
fn soft_subleading_photon_fails_leading_photons_cut() {
    let (selection, cuts, _) = run(&default_selector(), diphoton_event(50., 19., 60.));
    assert_eq!(selection, Selection::Rejected(LEADING_PHOTONS_PT));
    assert_eq!(cuts.applied_cuts(), vec![(LEADING_PHOTONS_PT, false)]);
    let (selection, _, _) = run(&default_selector(), diphoton_event(29., 25., 60.));
    assert_eq!(selection, Selection::Rejected(LEADING_PHOTONS_PT));
}

#[test]
fn heavy_diphoton_fails_mass_cut() {
    let mut rec = diphoton_event(50., 30., 60.);
    rec.photons[0] = photon(30., -2.3, 0.);
    let (selection, cuts, _) = run(&default_selector(), rec);
    assert_eq!(selection, Selection::Rejected(DIPHOTON_M));
    assert_eq!(
        cuts.applied_cuts(),
        vec![(LEADING_PHOTONS_PT, true), (DIPHOTON_M, false)]
    );
}

#[test]
fn diphoton_aligned_with_met_fails_azimuthal_cut() {
    let mut rec = diphoton_event(50., 30., 60.);
    rec.met = met(60., 1.);
    let (selection, cuts, _) = run(&default_selector(), rec);
    assert_eq!(selection, Selection::Rejected(AZIMUTHAL_SEP));
    assert_eq!(cuts.applied_cuts().len(), 3);
}

#[test]
fn jet_aligned_with_met_fails_jet_cut() {
    let mut rec = diphoton_event(50., 30., 60.);
    rec.jets = vec![
        // Too soft to matter
        jet(45., 0., PI),
        jet(80., 0.5, 0.3),
        jet(70., -1., PI - 0.2),
        jet(60., 1., 0.),
    ];
    let (selection, cuts, histos) = run(&default_selector(), rec);
    assert_eq!(selection, Selection::Rejected(JETS_AZIMUTAL_SEP));
    assert_eq!(
        &cuts.applied_cuts()[3..],
        &[(JETS_AZIMUTAL_SEP, true), (JETS_AZIMUTAL_SEP, false)]
    );
    assert!(histos.fills().is_empty());
}

#[test]
fn three_hard_jets_fail_multijet_cut() {
    let mut rec = diphoton_event(50., 30., 60.);
    rec.jets = vec![jet(60., 0., 0.5), jet(60., 1., 1.), jet(60., -1., -1.)];
    let (selection, cuts, histos) = run(&default_selector(), rec);
    assert_eq!(selection, Selection::Rejected(MULTIJET_BACKGROUNDS));
    assert_eq!(
        &cuts.applied_cuts()[3..],
        &[
            (JETS_AZIMUTAL_SEP, true),
            (JETS_AZIMUTAL_SEP, true),
            (JETS_AZIMUTAL_SEP, true),
            (MULTIJET_BACKGROUNDS, false),
        ]
    );
    assert!(histos.fills().is_empty());
}

#[test]
fn two_hard_jets_are_tolerated() {
    let mut rec = diphoton_event(50., 30., 60.);
    rec.jets = vec![jet(60., 0., 0.5), jet(60., 1., 1.)];
    let (selection, _, histos) = run(&default_selector(), rec);
    assert_eq!(selection, Selection::Accepted(LOW_PT_MISS));
    assert_single_fill(&histos, LOW_PT_MISS, 60.);
}

/// Event without photons, but with tau channel material and a high MET
fn tau_channel_event() -> RecEvent {
    RecEvent {
        electrons: vec![electron(40., 0., 2.)],
        muons: vec![muon(40., -1., -2.)],
        taus: vec![
            // Next to the electron
            tau(30., 0.1, 2.1),
            // Next to the muon
            tau(25., -1.2, -2.),
        ],
        met: met(150., 0.),
        ..RecEvent::default()
    }
}

#[test]
fn lepton_tau_channels_with_merged_muons() {
    let (selection, _, histos) = run(&default_selector(), tau_channel_event());
    // Tau channels are filled before any diphoton cut
    assert_eq!(selection, Selection::Rejected(LEADING_PHOTONS_PT));
    let fills = histos.fills();
    assert_eq!(fills.len(), 2, "{fills:?}");
    assert!(fills.iter().all(|&(name, _)| name == ETH));
}

#[test]
fn lepton_tau_channels_with_separate_muons() {
    let selector = EventSelector::new(SelectionCuts {
        separate_muon_list: true,
        ..SelectionCuts::default()
    });
    let (_, _, histos) = run(&selector, tau_channel_event());
    let names: Vec<_> = histos.fills().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec![ETH, UTH]);
}

#[test]
fn tau_channels_need_high_met() {
    let mut rec = tau_channel_event();
    rec.met = met(105., 0.);
    let (_, _, histos) = run(&default_selector(), rec);
    assert!(histos.fills().is_empty());
}

/// MET values filled into the electron + tau histogram
fn eth_fills(histos: &Recorder) -> Vec<Float> {
    histos
        .fills()
        .into_iter()
        .filter(|&(name, _)| name == ETH)
        .map(|(_, value)| value)
        .collect()
}

#[test]
fn lepton_tau_requirements() {
    let selector = default_selector();
    // Forward electron, so that a tau can be close to it yet too forward
    let with_tau = |tau| RecEvent {
        electrons: vec![electron(40., 2.0, 0.3)],
        taus: vec![tau],
        met: met(150., 0.),
        ..RecEvent::default()
    };

    // Close, hard and central enough
    let (_, _, histos) = run(&selector, with_tau(tau(21., 2.0, 0.)));
    assert_eq!(eth_fills(&histos), vec![150.]);

    // Too soft, down to exactly 20 GeV (φ = 0 keeps pt exact)
    for soft in [tau(19., 2.0, 0.), tau(20., 2.0, 0.)] {
        let (_, _, histos) = run(&selector, with_tau(soft));
        assert!(eth_fills(&histos).is_empty());
    }

    // Too forward
    let (_, _, histos) = run(&selector, with_tau(tau(50., 2.35, 0.3)));
    assert!(eth_fills(&histos).is_empty());

    // Too far
    let (_, _, histos) = run(&selector, with_tau(tau(50., 2.0, 0.9)));
    assert!(eth_fills(&histos).is_empty());
}

#[test]
fn lepton_tau_separation_bound_is_inclusive() {
    // ΔR = √(0.3² + 0.4²) = 0.5, up to rounding
    let lepton = electron(40., 0.1, 0.3);
    let close_tau = tau(30., 0.4, -0.1);
    let separation = lepton.dr(&close_tau);
    let rec = RecEvent {
        electrons: vec![lepton],
        taus: vec![close_tau],
        met: met(150., 0.),
        ..RecEvent::default()
    };

    // ΔR equal to the bound is accepted...
    let at_bound = EventSelector::new(SelectionCuts {
        lepton_tau_max_dr: separation,
        ..SelectionCuts::default()
    });
    let (_, _, histos) = run(&at_bound, rec.clone());
    assert_eq!(eth_fills(&histos), vec![150.]);

    // ...anything beyond is not
    let below_bound = EventSelector::new(SelectionCuts {
        lepton_tau_max_dr: separation * 0.999,
        ..SelectionCuts::default()
    });
    let (_, _, histos) = run(&below_bound, rec);
    assert!(eth_fills(&histos).is_empty());
}

#[test]
fn ditau_channel() {
    let rec = RecEvent {
        taus: vec![tau(50., 0., 0.), tau(45., 0.2, 0.1)],
        met: met(200., PI),
        ..RecEvent::default()
    };
    let (_, _, histos) = run(&default_selector(), rec);
    // The pair is found once from each of its taus
    assert_eq!(histos.fills(), vec![(THTH, 200.), (THTH, 200.)]);
}

#[test]
fn ditau_requirements() {
    let selector = default_selector();

    // Not enough pt: 40 + 20 < 65 (and the 20 GeV tau cannot be a partner)
    let soft = RecEvent {
        taus: vec![tau(40., 0., 0.), tau(20., 0.2, 0.1)],
        met: met(200., PI),
        ..RecEvent::default()
    };
    let (_, _, histos) = run(&selector, soft);
    let thth = histos.fills().iter().filter(|(name, _)| *name == THTH).count();
    assert_eq!(thth, 0);

    // Partner found in one direction only: 24 + 42 = 66 is enough
    let asymmetric = RecEvent {
        taus: vec![tau(24., 0., 0.), tau(42., 0.2, 0.1)],
        met: met(200., PI),
        ..RecEvent::default()
    };
    let (_, _, histos) = run(&selector, asymmetric);
    assert_eq!(histos.fills(), vec![(THTH, 200.)]);
}

#[test]
fn real_registries_end_to_end() {
    setup_logger();
    let selector = default_selector();
    let (mut cuts, mut histos) = (CutFlow::new(), HistogramSet::new());
    selector.initialize(&mut cuts, &mut histos).unwrap();

    let events = [
        Event::new(diphoton_event(50., 30., 60.), 2.),
        Event::new(diphoton_event(60., 35., 150.), 1.),
        Event::new(diphoton_event(50., 19., 60.), 1.),
        Event::default(),
    ];
    for event in &events {
        assert!(selector.execute(event, &mut cuts, &mut histos));
    }
    selector.finalize();

    assert_eq!(cuts.initial().entries, 3);
    let leading = cuts.cut(LEADING_PHOTONS_PT).unwrap();
    assert_eq!(leading.evaluated.entries, 3);
    assert_eq!(leading.passed.entries, 2);
    assert_eq!(leading.passed.sum_weights, 3.);
    assert_eq!(cuts.cut(KINETIC_REQUIREMENTS).unwrap().evaluated.entries, 0);

    let low = histos.get(LOW_PT_MISS).unwrap();
    assert_eq!(low.bins[1], 2.);
    let high = histos.get(HIGH_PT_MISS).unwrap();
    assert_eq!(high.bins[3], 1.);
}
