//! Model spawn records and their on-disk layout
//!
//! A spawn places one collision model in the world. Records are stored back
//! to back in host byte order:
//!
//! | field      | type       | notes                          |
//! |------------|------------|--------------------------------|
//! | flags      | u32        | `MOD_*` bits                   |
//! | adt_id     | u16        | owning tile                    |
//! | id         | u32        | unique within the file         |
//! | position   | 3 × f32    |                                |
//! | rotation   | 3 × f32    | degrees                        |
//! | scale      | f32        |                                |
//! | bound      | 6 × f32    | only when `MOD_HAS_BOUND` set  |
//! | name_len   | u32        | at most [`MAX_NAME_LEN`]       |
//! | name       | name_len B | not NUL terminated             |
//!
//! There is no magic or version; the flag bit alone decides whether the bound
//! block is present.

use crate::core::error::{Result, SpawnError, MAX_NAME_LEN};
use crate::geometry::Aabb;
use crate::vmap::transform::InstanceTransform;
use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use glam::Vec3;
use std::borrow::Cow;
use std::io::{self, Read, Write};

/// Doodad model: collision only, no area or liquid information
pub const MOD_M2: u32 = 1 << 0;
/// The single model spawned for a whole map instead of per tile
pub const MOD_WORLDSPAWN: u32 = 1 << 1;
/// Record carries a world-space bound
pub const MOD_HAS_BOUND: u32 = 1 << 2;

/// Fixed-size fields in a record without the bound block
const FIELDS_NO_BOUND: usize = 11;
/// Fixed-size fields in a record carrying the bound block
const FIELDS_WITH_BOUND: usize = 17;

/// One placed model as stored in a spawn file
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpawn {
    flags: u32,
    /// Tile the spawn belongs to
    pub adt_id: u16,
    /// Unique within its source file only
    pub id: u32,
    pub position: Vec3,
    /// Euler angles in degrees
    pub rotation: Vec3,
    pub scale: f32,
    bound: Option<Aabb>,
    /// Model file name, raw bytes as stored
    pub name: Vec<u8>,
}

impl ModelSpawn {
    /// Create a spawn with no flags and no bound
    pub fn new(
        id: u32,
        adt_id: u16,
        name: impl Into<Vec<u8>>,
        position: Vec3,
        rotation: Vec3,
        scale: f32,
    ) -> Self {
        Self {
            flags: 0,
            adt_id,
            id,
            position,
            rotation,
            scale,
            bound: None,
            name: name.into(),
        }
    }

    /// Add flag bits. `MOD_HAS_BOUND` is ignored here; it follows the bound.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags |= flags & !MOD_HAS_BOUND;
        self
    }

    /// Attach a world-space bound and set `MOD_HAS_BOUND`
    pub fn with_bound(mut self, bound: Aabb) -> Self {
        self.bound = Some(bound);
        self.flags |= MOD_HAS_BOUND;
        self
    }

    /// Derive the world bound from the model's own bound and this placement.
    ///
    /// Doodad spawns are extracted without a bound; this is how they get one
    /// before being used for ray queries.
    pub fn with_computed_bound(self, model_bound: &Aabb) -> Result<Self> {
        let bound = InstanceTransform::from_spawn(&self)?.world_bound(model_bound);
        Ok(self.with_bound(bound))
    }

    #[inline]
    pub fn flags(&self) -> u32 {
        self.flags
    }

    #[inline]
    pub fn bound(&self) -> Option<&Aabb> {
        self.bound.as_ref()
    }

    #[inline]
    pub fn has_bound(&self) -> bool {
        self.flags & MOD_HAS_BOUND != 0
    }

    #[inline]
    pub fn is_m2(&self) -> bool {
        self.flags & MOD_M2 != 0
    }

    #[inline]
    pub fn is_world_spawn(&self) -> bool {
        self.flags & MOD_WORLDSPAWN != 0
    }

    /// Name for display and logs; bytes that are not UTF-8 are replaced
    pub fn display_name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Whether both records describe the same placement (same id)
    pub fn same_placement(&self, other: &Self) -> bool {
        self.id == other.id
    }

    /// Read one record.
    ///
    /// `Ok(None)` means the stream ended cleanly before the record started,
    /// which is how callers detect the end of a spawn list. Every other
    /// failure is logged and returned as an error.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Option<Self>> {
        let result = Self::read_record(reader);
        if let Err(e) = &result {
            tracing::error!("Error reading ModelSpawn: {}", e);
        }
        result
    }

    /// Read one record together with the exact bytes it was decoded from
    pub fn read_with_bytes<R: Read>(reader: &mut R) -> Result<Option<(Self, Vec<u8>)>> {
        let mut recording = Recording {
            inner: reader,
            bytes: Vec::new(),
        };
        let spawn = Self::read_from(&mut recording)?;
        Ok(spawn.map(|spawn| (spawn, recording.bytes)))
    }

    /// Whether this record encodes to exactly `bytes`
    pub fn encodes_to(&self, bytes: &[u8]) -> Result<bool> {
        let mut encoded = Vec::with_capacity(bytes.len());
        self.write_to(&mut encoded)?;
        Ok(encoded == bytes)
    }

    fn read_record<R: Read>(reader: &mut R) -> Result<Option<Self>> {
        let flags = match read_leading_u32(reader) {
            Ok(Some(flags)) => flags,
            Ok(None) => return Ok(None),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(SpawnError::Truncated {
                    expected: FIELDS_NO_BOUND,
                    read: 0,
                })
            }
            Err(e) => return Err(e.into()),
        };

        let has_bound = flags & MOD_HAS_BOUND != 0;
        let mut fields = FieldReader {
            inner: reader,
            read: 1,
            expected: if has_bound {
                FIELDS_WITH_BOUND
            } else {
                FIELDS_NO_BOUND
            },
        };

        let adt_id = fields.u16()?;
        let id = fields.u32()?;
        let position = fields.vec3()?;
        let rotation = fields.vec3()?;
        let scale = fields.f32()?;
        let bound = if has_bound {
            let low = fields.vec3()?;
            let high = fields.vec3()?;
            Some(Aabb::new(low, high))
        } else {
            None
        };
        let name_len = fields.u32()? as usize;

        if name_len > MAX_NAME_LEN {
            return Err(SpawnError::NameTooLong(name_len));
        }

        let mut name = Vec::with_capacity(name_len);
        fields
            .inner
            .by_ref()
            .take(name_len as u64)
            .read_to_end(&mut name)?;
        if name.len() != name_len {
            return Err(SpawnError::NameTruncated {
                expected: name_len,
                read: name.len(),
            });
        }

        Ok(Some(Self {
            flags,
            adt_id,
            id,
            position,
            rotation,
            scale,
            bound,
            name,
        }))
    }

    /// Write this record in the layout [`ModelSpawn::read_from`] expects
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let name_len = self.name.len();
        if name_len > MAX_NAME_LEN {
            return Err(SpawnError::NameTooLong(name_len));
        }

        let mut fields = FieldWriter {
            inner: writer,
            written: 0,
            expected: if self.bound.is_some() {
                FIELDS_WITH_BOUND
            } else {
                FIELDS_NO_BOUND
            },
        };

        fields.u32(self.flags)?;
        fields.u16(self.adt_id)?;
        fields.u32(self.id)?;
        fields.vec3(self.position)?;
        fields.vec3(self.rotation)?;
        fields.f32(self.scale)?;
        if let Some(bound) = &self.bound {
            fields.vec3(bound.low)?;
            fields.vec3(bound.high)?;
        }
        fields.u32(name_len as u32)?;

        fields.inner.write_all(&self.name)?;
        Ok(())
    }
}

/// Read the first field, telling "no bytes at all" apart from a short read
fn read_leading_u32<R: Read>(reader: &mut R) -> io::Result<Option<u32>> {
    let mut buf = [0u8; 4];
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    match filled {
        0 => Ok(None),
        4 => Ok(Some(u32::from_ne_bytes(buf))),
        _ => Err(io::ErrorKind::UnexpectedEof.into()),
    }
}

/// Keeps a copy of everything read through it
struct Recording<'r, R> {
    inner: &'r mut R,
    bytes: Vec<u8>,
}

impl<R: Read> Read for Recording<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.bytes.extend_from_slice(&buf[..n]);
        Ok(n)
    }
}

/// Counts fixed fields as they are read so truncation reports where it stopped
struct FieldReader<'r, R> {
    inner: &'r mut R,
    read: usize,
    expected: usize,
}

impl<R: Read> FieldReader<'_, R> {
    fn field<T>(&mut self, read: impl FnOnce(&mut R) -> io::Result<T>) -> Result<T> {
        match read(self.inner) {
            Ok(value) => {
                self.read += 1;
                Ok(value)
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(SpawnError::Truncated {
                expected: self.expected,
                read: self.read,
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn u16(&mut self) -> Result<u16> {
        self.field(|r| r.read_u16::<NativeEndian>())
    }

    fn u32(&mut self) -> Result<u32> {
        self.field(|r| r.read_u32::<NativeEndian>())
    }

    fn f32(&mut self) -> Result<f32> {
        self.field(|r| r.read_f32::<NativeEndian>())
    }

    fn vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.f32()?, self.f32()?, self.f32()?))
    }
}

struct FieldWriter<'w, W> {
    inner: &'w mut W,
    written: usize,
    expected: usize,
}

impl<W: Write> FieldWriter<'_, W> {
    fn field(&mut self, write: impl FnOnce(&mut W) -> io::Result<()>) -> Result<()> {
        match write(self.inner) {
            Ok(()) => {
                self.written += 1;
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::WriteZero => Err(SpawnError::ShortWrite {
                expected: self.expected,
                written: self.written,
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn u16(&mut self, v: u16) -> Result<()> {
        self.field(|w| w.write_u16::<NativeEndian>(v))
    }

    fn u32(&mut self, v: u32) -> Result<()> {
        self.field(|w| w.write_u32::<NativeEndian>(v))
    }

    fn f32(&mut self, v: f32) -> Result<()> {
        self.field(|w| w.write_f32::<NativeEndian>(v))
    }

    fn vec3(&mut self, v: Vec3) -> Result<()> {
        self.f32(v.x)?;
        self.f32(v.y)?;
        self.f32(v.z)
    }
}

/// Iterates the records of a spawn list until the stream ends.
///
/// Yields `Err` once for a malformed record and then stops.
pub struct SpawnReader<R> {
    reader: R,
    done: bool,
}

impl<R: Read> SpawnReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            done: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for SpawnReader<R> {
    type Item = Result<ModelSpawn>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match ModelSpawn::read_from(&mut self.reader) {
            Ok(Some(spawn)) => Some(Ok(spawn)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Write a sequence of records back to back
pub fn write_spawns<'a, W: Write>(
    writer: &mut W,
    spawns: impl IntoIterator<Item = &'a ModelSpawn>,
) -> Result<usize> {
    let mut count = 0;
    for spawn in spawns {
        spawn.write_to(writer)?;
        count += 1;
    }
    Ok(count)
}
