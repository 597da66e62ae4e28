//! HDF5 snapshots of a solution.
//!
//! Layout: a `Header` group with the run metadata as attributes, and a `Cells` group with
//! the cell centroids and volumes and every derived quantity of the law, as flat row-major
//! datasets.

use std::path::Path;

use hdf5::File;

use crate::{
    conservation_law::{ConservationLaw, SetBasis},
    macros::{write_attrs, write_cell_dataset},
    mesh::Mesh,
    solution_field::SolutionField,
    time_integration::IntegrationReport,
};

pub fn write_snapshot<L: ConservationLaw, B: SetBasis, P: AsRef<Path>>(
    path: P,
    species: &L::Species,
    mesh: &Mesh,
    field: &SolutionField<L, B>,
    report: &IntegrationReport,
) -> hdf5::Result<()> {
    let file = File::create(path)?;
    let [ni, nj] = mesh.shape();

    let header = file.create_group("Header")?;
    write_attrs!(
        header,
        "Time" => report.time,
        "Steps" => report.steps,
        "LastTimestep" => report.last_dt,
        "Dimension" => usize::from(mesh.dimensionality()),
        "CellsX" => ni,
        "CellsY" => nj,
    );

    let cells = file.create_group("Cells")?;
    let volumes = mesh.cells();
    write_cell_dataset!(cells, volumes.iter().map(|cell| cell.centroid.x), "x");
    write_cell_dataset!(cells, volumes.iter().map(|cell| cell.centroid.y), "y");
    write_cell_dataset!(cells, volumes.iter().map(|cell| cell.volume), "Volume");

    let quantities: Vec<Vec<f64>> = field
        .interior()
        .iter()
        .map(|q| L::quantities(&q.to_state(species)))
        .collect();
    for (idx, name) in L::quantity_names().iter().enumerate() {
        write_cell_dataset!(cells, quantities.iter().map(|q| q[idx]), *name);
    }

    Ok(())
}
