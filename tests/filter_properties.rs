use climadash::charts;
use climadash::data::sample;
use climadash::filter::{Choice, FilterDimension, SelectionSet, filter};
use climadash::models::{RegionObservation, TimeSeriesPoint};

/// Index of each subset element in `data`, located by address.
fn positions<R>(data: &[R], subset: &[&R]) -> Vec<usize> {
    subset
        .iter()
        .map(|r| {
            data.iter()
                .position(|d| std::ptr::eq(d, *r))
                .expect("subset element comes from the dataset")
        })
        .collect()
}

fn selections(dims: &[FilterDimension<TimeSeriesPoint>]) -> Vec<SelectionSet> {
    let mut out = vec![SelectionSet::new()];
    for month in &dims[0].options {
        for year in std::iter::once(Choice::All)
            .chain(dims[1].options.iter().cloned().map(Choice::Only))
        {
            out.push(
                SelectionSet::new()
                    .with("month", Choice::only(month.clone()))
                    .with("year", year),
            );
        }
    }
    out
}

#[test]
fn subsets_are_ordered_subsets_by_identity() {
    let data = sample().temperature;
    let config = charts::temperature(&data);
    for sel in selections(&config.dimensions) {
        let subset = filter(&data, &config.dimensions, &sel);
        let idx = positions(&data, &subset);
        assert!(idx.windows(2).all(|w| w[0] < w[1]), "order kept for {sel:?}");
    }
}

#[test]
fn all_returns_everything_in_order() {
    let data = sample().rainfall;
    let config = charts::rainfall(&data);
    let subset = filter(&data, &config.dimensions, &SelectionSet::new());
    assert_eq!(subset.len(), data.len());
    assert_eq!(positions(&data, &subset), (0..data.len()).collect::<Vec<_>>());
}

#[test]
fn specific_value_keeps_only_matches_and_is_idempotent() {
    let data = sample().temperature;
    let config = charts::temperature(&data);
    let sel = SelectionSet::new()
        .with("month", Choice::only("March"))
        .with("year", Choice::only("2023"));
    let once = filter(&data, &config.dimensions, &sel);
    assert_eq!(once.len(), 1);
    assert_eq!(once[0].period, "Mar 2023");

    let twice = filter(once.iter().copied(), &config.dimensions, &sel);
    assert_eq!(twice, once);
}

#[test]
fn series_dimension_keeps_every_record() {
    let data = sample().rainfall;
    let config = charts::rainfall(&data);
    let sel = SelectionSet::new().with("region", Choice::only("Terai"));
    let subset: Vec<&RegionObservation> = filter(&data, &config.dimensions, &sel);
    assert_eq!(subset.len(), 24);
}

#[test]
fn year_filter_matches_period_suffix() {
    let data = sample().rainfall;
    let config = charts::rainfall(&data);
    let sel = SelectionSet::new().with("year", Choice::only("2022"));
    let subset = filter(&data, &config.dimensions, &sel);
    assert_eq!(subset.len(), 12);
    assert!(subset.iter().all(|r| r.year() == "2022"));
}

#[test]
fn unmatched_value_yields_empty_subset() {
    let data = sample().pollution;
    let config = charts::pollution(&data);
    let sel = SelectionSet::new().with("site", Choice::only("Pokhara"));
    assert!(filter(&data, &config.dimensions, &sel).is_empty());
}

#[test]
fn unknown_dimension_reads_as_all() {
    let data = sample().climate;
    let config = charts::climate(&data);
    let sel = SelectionSet::new().with("season", Choice::only("monsoon"));
    assert_eq!(filter(&data, &config.dimensions, &sel).len(), data.len());
}

#[test]
fn choice_parsing() {
    assert_eq!(Choice::parse("all"), Choice::All);
    assert_eq!(Choice::parse(" 2022 "), Choice::only("2022"));
    assert_eq!(Choice::All.to_string(), "All");
    let mut sel = SelectionSet::new();
    assert!(!sel.set("year", Choice::All));
    assert!(sel.set("year", Choice::only("2022")));
    assert!(!sel.set("year", Choice::only("2022")));
    assert_eq!(sel.get("month"), &Choice::All);
}

#[test]
fn year_filter_matches_whole_years_only() {
    let ds = sample();
    let config = charts::rainfall(&ds.rainfall);
    let partial = SelectionSet::new().with("year", Choice::only("22"));
    assert!(filter(&ds.rainfall, &config.dimensions, &partial).is_empty());
    let padded = SelectionSet::new().with("year", Choice::only(" 2023 "));
    assert_eq!(filter(&ds.rainfall, &config.dimensions, &padded).len(), 12);
}
