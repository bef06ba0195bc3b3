//! The `ndx-photostim` namespace

use crate::schema::spec::{
    AttributeSpec, DType, DatasetSpec, GroupSpec, NamespaceSpec, Quantity, Shapes, TypeInclude,
};

pub const NAMESPACE_NAME: &str = "ndx-photostim";
pub const NAMESPACE_VERSION: &str = "0.1.0";

fn dims(options: &[&[&str]]) -> Vec<Vec<String>> {
    options
        .iter()
        .map(|axes| axes.iter().map(|a| a.to_string()).collect())
        .collect()
}

fn planar_or_volumetric() -> Shapes {
    vec![vec![Some(2)], vec![Some(3)]]
}

fn any_2d_or_3d() -> Shapes {
    vec![vec![None; 2], vec![None; 3]]
}

fn optional_attribute(name: &str, doc: &str, dtype: &str) -> AttributeSpec {
    AttributeSpec::builder()
        .name(name)
        .doc(doc)
        .dtype(dtype)
        .required(false)
        .build()
}

fn size_attribute(name: &str, doc: &str) -> AttributeSpec {
    AttributeSpec::builder()
        .name(name)
        .doc(doc)
        .dtype("numeric")
        .required(false)
        .shape(planar_or_volumetric())
        .dims(dims(&[&["width", "height"], &["width", "height", "depth"]]))
        .build()
}

fn stim_duration() -> AttributeSpec {
    optional_attribute(
        "stim_duration",
        "Duration (in sec) the stimulus is presented following onset.",
        "numeric",
    )
}

fn roi_size() -> AttributeSpec {
    optional_attribute(
        "roi_size",
        "Size of a single stimulation ROI in pixels. If a scalar is provided, the ROI is \
         assumed to be a circle (for 2D patterns) or cylinder (for 3D patterns) centered at \
         the corresponding coordinates, with diameter 'roi_size'. If 'roi_size' is a two or \
         three dimensional array, the ROI is assumed to be a rectangle or cuboid, with \
         dimensions [width, height] or [width, height, depth]. This parameter is required \
         when using 'pixel_roi'.",
        "numeric",
    )
}

fn included(type_name: &str, name: &str, doc: &str) -> GroupSpec {
    GroupSpec::builder()
        .neurodata_type_inc(type_name)
        .name(name)
        .doc(doc)
        .build()
}

fn slm_spec() -> GroupSpec {
    GroupSpec::builder()
        .neurodata_type_def("SpatialLightModulator")
        .neurodata_type_inc("Device")
        .name("slm")
        .doc("Spatial light modulator (SLM) used in the experiment.")
        .quantity(Quantity::ZeroOrOne)
        .attributes(vec![
            optional_attribute("model", "Name of the SLM used in experiment.", "text"),
            size_attribute(
                "size",
                "Resolution of SpatialLightModulator (in pixels), formatted as \
                 [width, height] or [width, height, depth].",
            ),
        ])
        .build()
}

fn laser_spec() -> GroupSpec {
    GroupSpec::builder()
        .neurodata_type_def("Laser")
        .neurodata_type_inc("Device")
        .name("laser")
        .doc("Laser used in the experiment.")
        .quantity(Quantity::ZeroOrOne)
        .attributes(vec![
            optional_attribute("model", "Name of the laser used in experiment.", "text"),
            optional_attribute(
                "wavelength",
                "Excitation wavelength of stimulation light (nanometers).",
                "numeric",
            ),
            optional_attribute(
                "power",
                "Incident power of stimulation device (in milliwatts).",
                "numeric",
            ),
            optional_attribute(
                "peak_pulse_energy",
                "If device is pulsed laser: pulse energy (in microjoules).",
                "numeric",
            ),
            optional_attribute(
                "pulse_rate",
                "If device is pulsed laser: pulse rate (in kHz) used for stimulation.",
                "numeric",
            ),
        ])
        .build()
}

fn method_spec() -> GroupSpec {
    GroupSpec::builder()
        .neurodata_type_def("PhotostimulationMethod")
        .neurodata_type_inc("NWBContainer")
        .name("method")
        .doc("Methods used to apply patterned photostimulation.")
        .attributes(vec![
            optional_attribute(
                "stimulus_method",
                "Scanning or scanless method for shaping optogenetic light (e.g., diffraction \
                 limited points, 3D shot, disks, etc.).",
                "text",
            ),
            optional_attribute(
                "sweep_pattern",
                "Sweeping method, if spatially modulated during stimulation (none, or other).",
                "text",
            ),
            optional_attribute(
                "sweep_size",
                "Size or diameter of the scanning sweep pattern (in micrometers) if spatially \
                 modulated during stimulation.",
                "numeric",
            ),
            optional_attribute(
                "time_per_sweep",
                "Time to conduct a sweep (in milliseconds) if spatially modulated during \
                 stimulation.",
                "numeric",
            ),
            optional_attribute(
                "num_sweeps",
                "Repetition of a sweep pattern for a single stimulation instance if spatially \
                 modulated during stimulation.",
                "numeric",
            ),
            optional_attribute(
                "power_per_target",
                "Power (in milliWatts) applied to each target during patterned photostimulation.",
                "numeric",
            ),
            optional_attribute("opsin", "Opsin used for photostimulation.", "text"),
        ])
        .groups(vec![
            included(
                "SpatialLightModulator",
                "slm",
                "Spatial light modulator (SLM) used in the experiment.",
            ),
            included("Laser", "laser", "Laser used in the experiment."),
        ])
        .build()
}

fn pattern_spec() -> GroupSpec {
    GroupSpec::builder()
        .neurodata_type_def("HolographicPattern")
        .neurodata_type_inc("NWBContainer")
        .name("pattern")
        .doc("Container to store the pattern used in a photostimulation experiment.")
        .attributes(vec![
            size_attribute(
                "dimension",
                "Number of pixels on x, y, (and z) axes. Calculated automatically when ROI is \
                 input using 'image_mask_roi.' Required when using 'pixel_roi.'",
            ),
            stim_duration(),
            roi_size(),
        ])
        .datasets(vec![
            DatasetSpec::builder()
                .name("image_mask_roi")
                .doc(
                    "ROIs designated using a mask of size [width, height] (2D stimulation) or \
                     [width, height, depth] (3D stimulation), where for a given pixel a value of \
                     1 indicates stimulation, and a value of 0 indicates no stimulation.",
                )
                .quantity(Quantity::ZeroOrOne)
                .shape(any_2d_or_3d())
                .dims(dims(&[&["num_rows", "num_cols"], &["num_rows", "num_cols", "depth"]]))
                .build(),
            DatasetSpec::builder()
                .name("pixel_roi")
                .doc(
                    "ROIs designated as a list specifying the pixel ([x1, y1], [x2, y2], ...) or \
                     voxel ([x1, y1, z1], [x2, y2, z2], ...) of each ROI, where the items in the \
                     list are the coordinates of the center of the ROI. The size of each ROI is \
                     specified via the required 'roi_size' parameter.",
                )
                .quantity(Quantity::ZeroOrOne)
                .shape(any_2d_or_3d())
                .build(),
        ])
        .groups(vec![included(
            "PhotostimulationMethod",
            "method",
            "Methods used to apply patterned photostimulation.",
        )])
        .build()
}

fn series_spec() -> GroupSpec {
    GroupSpec::builder()
        .neurodata_type_def("PhotostimulationSeries")
        .neurodata_type_inc("TimeSeries")
        .doc("TimeSeries object for photostimulus presentation.")
        .quantity(Quantity::ZeroOrMany)
        .attributes(vec![
            stim_duration(),
            AttributeSpec::builder()
                .name("format")
                .doc(
                    "Format of data denoting stimulus presentation. Can be either 'interval' or \
                     'series'.",
                )
                .dtype("text")
                .build(),
            optional_attribute("epoch_length", "Length of each epoch (in seconds).", "numeric"),
        ])
        .groups(vec![included(
            "HolographicPattern",
            "pattern",
            "Container to store the pattern used in a photostimulation experiment.",
        )])
        .build()
}

fn table_spec() -> GroupSpec {
    GroupSpec::builder()
        .neurodata_type_def("PhotostimulationTable")
        .neurodata_type_inc("DynamicTable")
        .doc("Table to hold all of an experiment's PhotostimulationSeries objects.")
        .quantity(Quantity::ZeroOrOne)
        .datasets(vec![
            DatasetSpec::builder()
                .name("series")
                .doc("PhotostimulationSeries object corresponding to the row.")
                .neurodata_type_inc("VectorData")
                .dtype(DType::object_reference("PhotostimulationSeries"))
                .build(),
        ])
        .build()
}

/// Namespace describing the six photostimulation data types and the core
/// types they build on.
pub fn photostim_namespace() -> NamespaceSpec {
    let include = |namespace: &str, types: &[&str]| TypeInclude {
        namespace: namespace.to_string(),
        types: types.iter().map(|t| t.to_string()).collect(),
    };

    NamespaceSpec::builder()
        .name(NAMESPACE_NAME)
        .doc("holographic photostimulation extension to NWB standard")
        .version(NAMESPACE_VERSION)
        .author(vec!["Paul LaFosse".to_string(), "Carl Harris".to_string()])
        .contact(vec![
            "paul.lafosse@nih.gov".to_string(),
            "carlwharris1@gmail.com".to_string(),
        ])
        .includes(vec![
            include(
                "core",
                &["TimeSeries", "NWBDataInterface", "NWBContainer", "Device", "TimeIntervals"],
            ),
            include(
                "hdmf-common",
                &[
                    "Container",
                    "DynamicTable",
                    "DynamicTableRegion",
                    "VectorData",
                    "Data",
                    "ElementIdentifiers",
                ],
            ),
        ])
        .data_types(vec![
            slm_spec(),
            laser_spec(),
            method_spec(),
            pattern_spec(),
            series_spec(),
            table_spec(),
        ])
        .build()
}
