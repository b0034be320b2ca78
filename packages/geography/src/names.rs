//! Translation between data-source region names and boundary names.

/// `(data name, boundary name)` pairs for regions whose names differ
/// between the statistics and the boundary polygons.
pub const BOUNDARY_NAME_OVERRIDES: &[(&str, &str)] = &[
    ("Pulau Pinang", "Penang"),
    ("W.P. Kuala Lumpur", "Kuala Lumpur"),
];

/// Maps a data-source region name to the name used by the boundary data.
///
/// Names without an override are returned unchanged.
#[must_use]
pub fn boundary_name(data_name: &str) -> &str {
    BOUNDARY_NAME_OVERRIDES
        .iter()
        .find(|(from, _)| *from == data_name)
        .map_or(data_name, |(_, to)| *to)
}
