//! Native .navmesh binary format.
//!
//! Format:
//! - Header (16 bytes):
//!   - Magic: "NVMSH" (5 bytes)
//!   - Version: u8 (1 byte)
//!   - Vertex count: u32 (4 bytes, little-endian)
//!   - Reserved: 6 bytes
//! - Vertex records, sorted by position:
//!   - Position: map u16 LE, x u8, y u8 (4 bytes)
//!   - Edge mask: u8, bit i set when an edge exists for direction index i
//!   - One destination position (4 bytes) per set bit, in direction order
//!
//! Vertices are written sorted so serializing the same mesh twice produces
//! identical bytes.

use crate::core::{Direction, Position};
use crate::error::{CartographerError, Result};
use crate::navmesh::Navmesh;
use std::io::{Read, Write};
use std::path::Path;

/// Magic bytes for the .navmesh format
const MAGIC: &[u8; 5] = b"NVMSH";

/// Current format version
const VERSION: u8 = 1;

/// Header size in bytes
const HEADER_SIZE: usize = 16;

/// Write a navmesh to a stream.
pub fn serialize_navmesh<W: Write>(mesh: &Navmesh, writer: &mut W) -> Result<()> {
    let vertex_count: u32 = mesh
        .vertex_count()
        .try_into()
        .map_err(|_| CartographerError::Format("too many vertices for format".into()))?;

    let mut header = [0u8; HEADER_SIZE];
    header[..5].copy_from_slice(MAGIC);
    header[5] = VERSION;
    header[6..10].copy_from_slice(&vertex_count.to_le_bytes());
    writer.write_all(&header)?;

    let mut positions: Vec<Position> = mesh.positions().collect();
    positions.sort_unstable();
    for src in positions {
        write_position(writer, src)?;
        let mut mask = 0u8;
        for (dir, _) in mesh.edges_from(src) {
            mask |= 1 << dir.index();
        }
        writer.write_all(&[mask])?;
        for (_, dst) in mesh.edges_from(src) {
            write_position(writer, dst)?;
        }
    }
    Ok(())
}

/// Read a navmesh from a stream.
pub fn deserialize_navmesh<R: Read>(reader: &mut R) -> Result<Navmesh> {
    let mut header = [0u8; HEADER_SIZE];
    reader
        .read_exact(&mut header)
        .map_err(|e| CartographerError::Format(format!("truncated header: {e}")))?;

    if &header[..5] != MAGIC {
        return Err(CartographerError::Format("bad magic bytes".into()));
    }
    if header[5] != VERSION {
        return Err(CartographerError::Format(format!(
            "unsupported version {} (expected {VERSION})",
            header[5]
        )));
    }
    let vertex_count = u32::from_le_bytes([header[6], header[7], header[8], header[9]]);

    let mut mesh = Navmesh::new();
    for _ in 0..vertex_count {
        let src = read_position(reader)?;
        mesh.insert_vertex(src);
        let mut mask = [0u8; 1];
        reader
            .read_exact(&mut mask)
            .map_err(|e| CartographerError::Format(format!("truncated vertex: {e}")))?;
        if mask[0] & 0xF0 != 0 {
            return Err(CartographerError::Format(format!(
                "invalid edge mask {:#04x}",
                mask[0]
            )));
        }
        for index in 0..4 {
            if mask[0] & (1 << index) == 0 {
                continue;
            }
            let dst = read_position(reader)?;
            let dir = Direction::from_index(index)
                .ok_or_else(|| CartographerError::Format("invalid direction index".into()))?;
            // A well-formed file never conflicts with itself.
            mesh.add_edge(src, dir, dst)
                .map_err(|e| CartographerError::Format(format!("inconsistent edge data: {e}")))?;
        }
    }
    Ok(mesh)
}

fn write_position<W: Write>(writer: &mut W, p: Position) -> Result<()> {
    writer.write_all(&p.map.to_le_bytes())?;
    writer.write_all(&[p.x, p.y])?;
    Ok(())
}

fn read_position<R: Read>(reader: &mut R) -> Result<Position> {
    let mut buf = [0u8; 4];
    reader
        .read_exact(&mut buf)
        .map_err(|e| CartographerError::Format(format!("truncated position: {e}")))?;
    Ok(Position::new(u16::from_le_bytes([buf[0], buf[1]]), buf[2], buf[3]))
}

/// Save a navmesh to a file.
pub fn save_navmesh(mesh: &Navmesh, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    serialize_navmesh(mesh, &mut file)?;
    Ok(())
}

/// Load a navmesh from a file.
pub fn load_navmesh(path: &Path) -> Result<Navmesh> {
    let mut file = std::fs::File::open(path)?;
    deserialize_navmesh(&mut file)
}
