/// Write `name => value` pairs as scalar attributes of an hdf5 location.
macro_rules! write_attrs {
    ($location:expr, $($name:expr => $value:expr),+ $(,)?) => {
        $(
            $location
                .new_attr_builder()
                .with_data(&[$value])
                .create($name)?;
        )+
    };
}

/// Write a flat `f64` dataset, one entry per cell in row-major order.
macro_rules! write_cell_dataset {
    ($group:expr, $values:expr, $name:expr) => {
        $group
            .new_dataset_builder()
            .with_data(&$values.collect::<Vec<f64>>())
            .create($name)?
    };
}

pub(crate) use write_attrs;
pub(crate) use write_cell_dataset;
