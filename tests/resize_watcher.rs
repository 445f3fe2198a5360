use climadash::Chart;
use climadash::charts::Dashboard;
use climadash::data::sample;
use climadash::filter::Choice;
use climadash::models::Dimensions;
use climadash::resize::ResizeWatcher;

#[test]
fn reports_only_width_changes() {
    let (mut watcher, rx) = ResizeWatcher::attach(350);
    assert!(watcher.observe(800));
    assert_eq!(rx.try_recv().unwrap(), Dimensions::new(800, 350));

    assert!(!watcher.observe(800));
    assert!(rx.try_recv().is_err());

    assert!(watcher.observe(640));
    assert_eq!(rx.try_recv().unwrap(), Dimensions::new(640, 350));
}

#[test]
fn detached_watcher_goes_quiet() {
    let (mut watcher, rx) = ResizeWatcher::attach(235);
    watcher.detach();
    assert!(!watcher.is_attached());
    assert!(!watcher.observe(500));
    assert!(rx.try_recv().is_err());
    // idempotent
    watcher.detach();
}

#[test]
fn dropped_receiver_detaches() {
    let (mut watcher, rx) = ResizeWatcher::attach(350);
    drop(rx);
    assert!(!watcher.observe(300));
    assert!(!watcher.is_attached());
}

#[test]
fn pipeline_redraws_on_resize_and_selection() {
    let mut dash = Dashboard::from_dataset(sample());
    let chart = dash.chart_mut("temperature").unwrap();
    let mut watcher = chart.watch();

    // nothing reported yet
    assert!(!chart.refresh());
    assert!(chart.scene().is_none());

    watcher.observe(800);
    assert!(chart.refresh());
    assert_eq!(chart.dimensions(), Some(Dimensions::new(800, 350)));
    assert_eq!(chart.scene().unwrap().width, 800);
    assert!(!chart.refresh());
    assert_eq!(chart.redraws(), 1);

    chart
        .controls_mut()
        .choose("year", Choice::only("2023"))
        .unwrap();
    assert!(chart.refresh());
    assert_eq!(chart.redraws(), 2);

    watcher.observe(600);
    assert!(chart.refresh());
    assert_eq!(chart.scene().unwrap().width, 600);
    assert_eq!(chart.redraws(), 3);

    drop(watcher);
    assert!(!chart.refresh());
    assert_eq!(chart.dimensions(), Some(Dimensions::new(600, 350)));
    assert!(chart.scene().is_some());
}

#[test]
fn zero_width_clears_the_scene() {
    let mut dash = Dashboard::from_dataset(sample());
    let chart = dash.chart_mut("pollution").unwrap();
    let mut watcher = chart.watch();
    watcher.observe(700);
    assert!(chart.refresh());
    assert_eq!(chart.scene().unwrap().height, 235);

    watcher.observe(0);
    assert!(!chart.refresh());
    assert!(chart.scene().is_none());

    watcher.observe(700);
    assert!(chart.refresh());
    assert!(chart.scene().is_some());
}

#[test]
fn locale_change_redraws() {
    let mut dash = Dashboard::from_dataset(sample());
    let chart = dash.chart_mut("rainfall").unwrap();
    let mut watcher = chart.watch();
    watcher.observe(800);
    assert!(chart.refresh());
    chart.set_locale("de");
    assert!(chart.refresh());
    chart.set_locale("de");
    assert!(!chart.refresh());
}
