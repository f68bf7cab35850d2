use crate::error::{Error, Result};
use crate::field::Field;
use crate::space::FunctionSpace;
use std::path::{Path, PathBuf};
use vtkio::model::*;

/// Write one scalar field over the structured mesh as a legacy ascii vtk
/// file, quad cells over the grid points.
pub fn write_vtk2d<F: AsRef<Path>>(space: &FunctionSpace, field: &Field, s: &F) -> Result<()> {
    println!("Writing vtk: {:?}", s.as_ref());
    assert_eq!(field.len(), space.dof_count());

    let mut points = Vec::with_capacity(3 * space.dof_count());
    for (_, p) in space.nodes() {
        points.push(p.x);
        points.push(p.y);
        points.push(0.0);
    }

    let quads = space.quads();
    let mut connectivity = Vec::with_capacity(4 * quads.len());
    let mut offsets = Vec::with_capacity(quads.len());
    let mut cell_types = Vec::with_capacity(quads.len());
    let mut offset = 4;
    for quad in &quads {
        for &dof in quad {
            connectivity.push(dof as u64);
        }
        offsets.push(offset);
        cell_types.push(CellType::Quad);
        offset += 4;
    }

    let data: Vec<f64> = field.values().iter().copied().collect();

    Vtk {
        version: Version::Auto,
        title: String::new(),
        byte_order: ByteOrder::LittleEndian,
        file_path: None,
        data: DataSet::inline(UnstructuredGridPiece {
            points: IOBuffer::F64(points),
            cells: Cells {
                cell_verts: VertexNumbers::XML {
                    connectivity,
                    offsets,
                },
                types: cell_types,
            },
            data: Attributes {
                point: vec![Attribute::DataArray(DataArray {
                    name: field.name().to_string(),
                    elem: ElementType::Scalars {
                        num_comp: 1,
                        lookup_table: None,
                    },
                    data: IOBuffer::F64(data),
                })],
                cell: vec![],
            },
        }),
    }
    .export_ascii(s)
    .map_err(|e| Error::Output(format!("{e:?}")))
}

/// Per-participant output series: one file per field per frame, written
/// only for completed coupling windows (plus the initial state).
pub struct OutputSeries {
    dir: PathBuf,
    tag: String,
    frame: usize,
}

impl OutputSeries {
    pub fn new<P: AsRef<Path>>(dir: P, tag: &str) -> Result<Self> {
        std::fs::create_dir_all(dir.as_ref())?;
        Ok(OutputSeries {
            dir: dir.as_ref().to_path_buf(),
            tag: tag.to_string(),
            frame: 0,
        })
    }

    pub fn frames_written(&self) -> usize {
        self.frame
    }

    /// Write one frame of the given fields, then advance the frame index.
    pub fn write_frame(&mut self, space: &FunctionSpace, fields: &[&Field]) -> Result<()> {
        for field in fields {
            let path = self
                .dir
                .join(format!("{}-{}_{:04}.vtk", field.name(), self.tag, self.frame));
            write_vtk2d(space, field, &path)?;
        }
        self.frame += 1;
        Ok(())
    }
}
