use ndarray::{Array3, array, s};
use ndx_photostim::schema::NamespaceSpec;
use ndx_photostim::utils::{find_by_pattern, find_in_window};
use ndx_photostim::{
    Dimension, HolographicPattern, Laser, PhotostimError, PhotostimulationMethod,
    PhotostimulationSeries, PhotostimulationTable, RoiSize, SpatialLightModulator,
    StimulusFormat, image_to_pixel_mask, photostim_namespace, pixel_to_image_mask,
};
use std::sync::Arc;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn test_full_experiment() -> TestResult {
    let mut method = PhotostimulationMethod::builder()
        .name("method")
        .stimulus_method("scanless")
        .sweep_pattern("none")
        .power_per_target(8.0)
        .opsin("ChRmine")
        .build();
    method.add_slm(
        SpatialLightModulator::builder()
            .name("slm")
            .size(Dimension::planar(512, 512)?)
            .build(),
    )?;
    method.add_laser(Laser::builder().name("laser").wavelength(1030.0).build())?;

    let pattern = Arc::new(
        HolographicPattern::builder()
            .name("pattern")
            .pixel_roi(array![[100.0, 100.0], [200.0, 300.0], [400.0, 50.0]])
            .roi_size(10.0)
            .dimension(Dimension::planar(512, 512)?)
            .stim_duration(0.3)
            .method(method)
            .build()?,
    );
    assert_eq!(pattern.num_rois(), Some(3));

    let mut series = PhotostimulationSeries::builder()
        .name("series_1")
        .format(StimulusFormat::Interval)
        .stim_duration(0.3)
        .pattern(Arc::clone(&pattern))
        .build()?;
    series.add_onsets(&[1.0, 2.0, 5.0])?;

    let mut rate_series = PhotostimulationSeries::builder()
        .name("series_2")
        .format(StimulusFormat::Series)
        .data(vec![0.0, 1.0, 0.0, 1.0])
        .rate(2.0)
        .starting_time(10.0)
        .stim_duration(0.3)
        .pattern(Arc::clone(&pattern))
        .build()?;
    assert!(rate_series.add_onset(12.0).is_err());

    let mut table = PhotostimulationTable::builder()
        .name("table")
        .description("all presentations")
        .build();
    table.add_series(vec![series, rate_series], None)?;

    let df = table.to_dataframe()?;
    assert_eq!(df.height(), 2);
    assert_eq!(find_by_pattern(&df, "pattern").collect()?.height(), 2);
    assert_eq!(find_in_window(&df, 9.0, 20.0).collect()?.height(), 1);

    let times = table.presentation_times()?;
    assert_eq!(times[0].1.len(), 3);
    let expected = [(10.5, 10.8), (11.5, 11.8)];
    assert_eq!(times[1].1.len(), expected.len());
    for ((start, stop), (want_start, want_stop)) in times[1].1.iter().zip(expected) {
        assert!((start - want_start).abs() < 1e-9);
        assert!((stop - want_stop).abs() < 1e-9);
    }
    Ok(())
}

#[test]
fn test_mask_conversion_round_trip() -> TestResult {
    let dimension = Dimension::planar(40, 30)?;
    let centers = array![[5.0, 5.0], [20.0, 15.0]];
    let mask = pixel_to_image_mask(centers.view(), &RoiSize::from([4.0, 2.0]), &dimension)?;
    assert_eq!(mask.shape(), &[40, 30]);

    let entries = image_to_pixel_mask(&mask);
    assert_eq!(entries.len(), 2 * 5 * 3);
    assert!(entries.iter().all(|e| mask[[e.x, e.y]] == 1 && e.weight == 1.0));
    Ok(())
}

#[test]
fn test_volumetric_pattern() -> TestResult {
    let mut mask = Array3::<f64>::zeros((10, 10, 4));
    mask.slice_mut(s![2..4, 2..4, 1..3]).fill(1.0);

    let mut pattern = HolographicPattern::builder()
        .name("volume")
        .image_mask_roi(mask.into_dyn())
        .roi_size(vec![2.0, 2.0, 2.0])
        .build()?;
    assert_eq!(pattern.dimension().depth(), Some(4));
    assert_eq!(pattern.voxel_mask()?.len(), 8);
    assert!(matches!(
        pattern.pixel_mask(),
        Err(PhotostimError::UnsupportedDimension { rank: 3, .. })
    ));

    pattern.add_roi(&[7.0, 7.0, 2.0])?;
    assert_eq!(pattern.voxel_mask()?.len(), 8 + 27);
    Ok(())
}

#[test]
fn test_pattern_from_json_config() -> TestResult {
    let pattern: HolographicPattern = serde_json::from_str(
        r#"{
            "name": "from_config",
            "pixel_roi": {"v": 1, "dim": [2, 2], "data": [4.0, 4.0, 12.0, 8.0]},
            "roi_size": 3.0,
            "dimension": [16, 16]
        }"#,
    )?;
    assert_eq!(pattern.num_rois(), Some(2));

    let rejected = serde_json::from_str::<HolographicPattern>(
        r#"{"name": "no_roi", "roi_size": 3.0, "dimension": [16, 16]}"#,
    );
    assert!(rejected.is_err());
    Ok(())
}

#[test]
fn test_namespace_export() -> TestResult {
    let json = photostim_namespace().to_json()?;
    let ns = NamespaceSpec::from_json(&json)?;
    assert_eq!(ns.name, "ndx-photostim");
    assert_eq!(ns.version, "0.1.0");
    assert_eq!(ns.data_types.len(), 6);
    Ok(())
}
