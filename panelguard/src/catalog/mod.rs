//! Pure derivations over catalog data: stack geometry, panel size classes
//! and spec-bag extraction. No I/O, no retained state.

pub mod dimensions;
pub mod specs;

pub use dimensions::{
    calculate_combinator_dimensions, combinator_stack_dimensions, filter_by_size_and_type,
    panel_size_from_width, Dimensions,
};
pub use specs::{
    extract_a_values, extract_combinator_brands, extract_combinator_currents,
    extract_combinator_poles, extract_combinator_series, extract_p_values, extract_spec_values,
    extract_v_values,
};
