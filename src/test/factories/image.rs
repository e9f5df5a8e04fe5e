//! Factory for synthetic PE images.
//!
//! Builds minimal but well-formed PE32 / PE32+ images with a single `.text` section. Managed
//! images carry a CLI header, a metadata root with `#~` and `#Strings` streams, and the tables
//! `Module`, `TypeDef`, `Assembly` and `AssemblyRef`; optional extra tables precede `AssemblyRef`
//! to exercise the row size computation. Native images have the same layout without data
//! directory 14.
//!
//! Uses only `std` so integration tests can include it with `#[path]`.

#![allow(dead_code)]

use std::{io, path::Path};

const PE_OFFSET: usize = 0x80;
const COFF_OFFSET: usize = PE_OFFSET + 4;
const OPTIONAL_HEADER_OFFSET: usize = COFF_OFFSET + 20;
const HEADERS_SIZE: usize = 0x200;
const FILE_ALIGNMENT: usize = 0x200;
const SECTION_ALIGNMENT: usize = 0x2000;
const COR20_SIZE: usize = 72;
const CLR_DIRECTORY: usize = 14;

const TABLE_MODULE: u8 = 0x00;
const TABLE_TYPEREF: u8 = 0x01;
const TABLE_TYPEDEF: u8 = 0x02;
const TABLE_METHODDEF: u8 = 0x06;
const TABLE_MEMBERREF: u8 = 0x0A;
const TABLE_CUSTOMATTRIBUTE: u8 = 0x0C;
const TABLE_STANDALONESIG: u8 = 0x11;
const TABLE_ASSEMBLY: u8 = 0x20;
const TABLE_ASSEMBLYREF: u8 = 0x23;
const TABLE_UNKNOWN: u8 = 0x3F;

/// One `AssemblyRef` row to emit.
#[derive(Clone, Debug)]
pub struct ReferenceSpec {
    /// Referenced assembly name
    pub name: String,
    /// Major, minor, build, revision
    pub version: (u16, u16, u16, u16),
    /// Culture, `None` for neutral
    pub culture: Option<String>,
}

/// Builder for synthetic PE images.
#[derive(Clone, Debug)]
pub struct ImageBuilder {
    managed: bool,
    references: Vec<ReferenceSpec>,
    large_strings: bool,
    preceding_type_refs: Option<u32>,
    trailing_unknown_table: bool,
    pe32_plus: bool,
    strings_heap: bool,
    tables_stream: bool,
    uncompressed: bool,
}

struct TableSpec {
    bit: u8,
    rows: u32,
    data: Vec<u8>,
}

impl TableSpec {
    fn zeroed(bit: u8, rows: u32, row_size: usize) -> Self {
        TableSpec {
            bit,
            rows,
            data: vec![0; rows as usize * row_size],
        }
    }
}

impl ImageBuilder {
    /// Virtual address of the `.text` section; the CLI header sits at its start.
    pub const SECTION_RVA: u32 = 0x2000;
    /// File offset of the `.text` section.
    pub const SECTION_FILE_OFFSET: u32 = 0x200;

    /// A managed image referencing `references`, each at version 1.0.0.0 with neutral culture.
    pub fn managed(references: &[&str]) -> Self {
        ImageBuilder {
            managed: true,
            references: references
                .iter()
                .map(|name| ReferenceSpec {
                    name: (*name).to_string(),
                    version: (1, 0, 0, 0),
                    culture: None,
                })
                .collect(),
            large_strings: false,
            preceding_type_refs: None,
            trailing_unknown_table: false,
            pe32_plus: false,
            strings_heap: true,
            tables_stream: true,
            uncompressed: false,
        }
    }

    /// A well-formed image without a CLI header.
    pub fn native() -> Self {
        ImageBuilder {
            managed: false,
            ..ImageBuilder::managed(&[])
        }
    }

    /// Adds a reference with an explicit version and culture.
    pub fn reference(
        mut self,
        name: &str,
        version: (u16, u16, u16, u16),
        culture: Option<&str>,
    ) -> Self {
        self.references.push(ReferenceSpec {
            name: name.to_string(),
            version,
            culture: culture.map(str::to_string),
        });
        self
    }

    /// Pads the `#Strings` heap past 64 KiB and sets the 4-byte string index flag.
    pub fn large_strings(mut self) -> Self {
        self.large_strings = true;
        self
    }

    /// Emits `TypeRef` (`type_refs` rows), `MethodDef`, `MemberRef`, `CustomAttribute` and
    /// `StandAloneSig` before `AssemblyRef`. 0x4000 or more type refs widen coded indexes.
    pub fn preceding_tables(mut self, type_refs: u32) -> Self {
        self.preceding_type_refs = Some(type_refs.max(1));
        self
    }

    /// Sets an unassigned high bit in the `valid` vector with one row count.
    pub fn trailing_unknown_table(mut self) -> Self {
        self.trailing_unknown_table = true;
        self
    }

    /// Emits a PE32+ optional header instead of PE32.
    pub fn pe32_plus(mut self) -> Self {
        self.pe32_plus = true;
        self
    }

    /// Leaves out the `#Strings` stream.
    pub fn without_strings_heap(mut self) -> Self {
        self.strings_heap = false;
        self
    }

    /// Leaves out the tables stream.
    pub fn without_tables_stream(mut self) -> Self {
        self.tables_stream = false;
        self
    }

    /// Names the tables stream `#-` instead of `#~`.
    pub fn uncompressed(mut self) -> Self {
        self.uncompressed = true;
        self
    }

    /// Produces the image bytes.
    pub fn build(&self) -> Vec<u8> {
        let section = if self.managed {
            self.clr_section()
        } else {
            vec![0xC3; 0x10]
        };

        self.pe(&section)
    }

    /// Writes the image to `path`.
    pub fn write(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.build())
    }

    fn str_width(&self) -> usize {
        if self.large_strings {
            4
        } else {
            2
        }
    }

    fn pe(&self, section: &[u8]) -> Vec<u8> {
        let raw_size = align(section.len(), FILE_ALIGNMENT);
        let optional_header_size = if self.pe32_plus { 240 } else { 224 };
        let section_table = OPTIONAL_HEADER_OFFSET + optional_header_size;

        let mut image = vec![0u8; HEADERS_SIZE + raw_size];

        // DOS header
        image[0..2].copy_from_slice(b"MZ");
        put_u32(&mut image, 0x3C, PE_OFFSET as u32);

        // COFF header
        image[PE_OFFSET..PE_OFFSET + 4].copy_from_slice(b"PE\0\0");
        let (machine, characteristics) = if self.pe32_plus {
            (0x8664, 0x2022)
        } else {
            (0x014C, 0x2102)
        };
        put_u16(&mut image, COFF_OFFSET, machine);
        put_u16(&mut image, COFF_OFFSET + 2, 1);
        put_u16(&mut image, COFF_OFFSET + 16, optional_header_size as u16);
        put_u16(&mut image, COFF_OFFSET + 18, characteristics);

        // Optional header
        let opt = OPTIONAL_HEADER_OFFSET;
        put_u16(&mut image, opt, if self.pe32_plus { 0x20B } else { 0x10B });
        image[opt + 2] = 8;
        put_u32(&mut image, opt + 4, raw_size as u32);
        put_u32(&mut image, opt + 20, Self::SECTION_RVA);

        let size_of_image = align(Self::SECTION_RVA as usize + section.len(), SECTION_ALIGNMENT);
        let directories = if self.pe32_plus {
            put_u64(&mut image, opt + 24, 0x1_8000_0000);
            opt + 112
        } else {
            put_u32(&mut image, opt + 28, 0x0040_0000);
            opt + 96
        };
        put_u32(&mut image, opt + 32, SECTION_ALIGNMENT as u32);
        put_u32(&mut image, opt + 36, FILE_ALIGNMENT as u32);
        put_u16(&mut image, opt + 40, 4);
        put_u16(&mut image, opt + 48, 4);
        put_u32(&mut image, opt + 56, size_of_image as u32);
        put_u32(&mut image, opt + 60, HEADERS_SIZE as u32);
        put_u16(&mut image, opt + 68, 3);
        put_u16(&mut image, opt + 70, 0x8540);
        if self.pe32_plus {
            put_u64(&mut image, opt + 72, 0x10_0000);
            put_u64(&mut image, opt + 80, 0x1000);
            put_u64(&mut image, opt + 88, 0x10_0000);
            put_u64(&mut image, opt + 96, 0x1000);
            put_u32(&mut image, opt + 108, 16);
        } else {
            put_u32(&mut image, opt + 72, 0x10_0000);
            put_u32(&mut image, opt + 76, 0x1000);
            put_u32(&mut image, opt + 80, 0x10_0000);
            put_u32(&mut image, opt + 84, 0x1000);
            put_u32(&mut image, opt + 92, 16);
        }

        if self.managed {
            put_u32(&mut image, directories + CLR_DIRECTORY * 8, Self::SECTION_RVA);
            put_u32(&mut image, directories + CLR_DIRECTORY * 8 + 4, COR20_SIZE as u32);
        }

        // Section table
        image[section_table..section_table + 5].copy_from_slice(b".text");
        put_u32(&mut image, section_table + 8, section.len() as u32);
        put_u32(&mut image, section_table + 12, Self::SECTION_RVA);
        put_u32(&mut image, section_table + 16, raw_size as u32);
        put_u32(&mut image, section_table + 20, Self::SECTION_FILE_OFFSET);
        put_u32(&mut image, section_table + 36, 0x6000_0020);

        let start = Self::SECTION_FILE_OFFSET as usize;
        image[start..start + section.len()].copy_from_slice(section);

        image
    }

    fn clr_section(&self) -> Vec<u8> {
        let metadata = self.metadata();

        let mut section = vec![0u8; COR20_SIZE];
        put_u32(&mut section, 0, COR20_SIZE as u32);
        put_u16(&mut section, 4, 2);
        put_u16(&mut section, 6, 5);
        put_u32(&mut section, 8, Self::SECTION_RVA + COR20_SIZE as u32);
        put_u32(&mut section, 12, metadata.len() as u32);
        put_u32(&mut section, 16, 1);

        section.extend_from_slice(&metadata);
        section
    }

    fn metadata(&self) -> Vec<u8> {
        let (strings, indexes) = self.strings();
        let tables = self.tables(&indexes);

        let mut streams: Vec<(&str, Vec<u8>)> = Vec::new();
        if self.tables_stream {
            streams.push((if self.uncompressed { "#-" } else { "#~" }, tables));
        }
        if self.strings_heap {
            streams.push(("#Strings", strings));
        }
        for (_, data) in &mut streams {
            data.resize(align(data.len(), 4), 0);
        }

        let mut root = Vec::new();
        root.extend_from_slice(b"BSJB");
        root.extend_from_slice(&1u16.to_le_bytes());
        root.extend_from_slice(&1u16.to_le_bytes());
        root.extend_from_slice(&0u32.to_le_bytes());
        root.extend_from_slice(&12u32.to_le_bytes());
        root.extend_from_slice(b"v4.0.30319\0\0");
        root.extend_from_slice(&0u16.to_le_bytes());
        root.extend_from_slice(&(streams.len() as u16).to_le_bytes());

        let headers_size: usize = streams
            .iter()
            .map(|(name, _)| 8 + align(name.len() + 1, 4))
            .sum();
        let mut offset = root.len() + headers_size;

        for (name, data) in &streams {
            root.extend_from_slice(&(offset as u32).to_le_bytes());
            root.extend_from_slice(&(data.len() as u32).to_le_bytes());
            root.extend_from_slice(name.as_bytes());
            root.resize(root.len() + align(name.len() + 1, 4) - name.len(), 0);
            offset += data.len();
        }

        for (_, data) in streams {
            root.extend_from_slice(&data);
        }

        root
    }

    /// The `#Strings` heap and the (name, culture) index of every reference.
    fn strings(&self) -> (Vec<u8>, Vec<(u32, u32)>) {
        let mut heap = vec![0u8];
        if self.large_strings {
            heap.resize(0x1_0000, 0);
        }

        let push = |heap: &mut Vec<u8>, value: &str| {
            let index = heap.len() as u32;
            heap.extend_from_slice(value.as_bytes());
            heap.push(0);
            index
        };

        push(&mut heap, "<Module>");

        let indexes = self
            .references
            .iter()
            .map(|reference| {
                let name = push(&mut heap, &reference.name);
                let culture = reference
                    .culture
                    .as_deref()
                    .map_or(0, |culture| push(&mut heap, culture));
                (name, culture)
            })
            .collect();

        (heap, indexes)
    }

    fn tables(&self, indexes: &[(u32, u32)]) -> Vec<u8> {
        let s = self.str_width();
        let g = 2;
        let b = 2;
        let coded = |tag_bits: u32, rows: u32| {
            if rows >= 1 << (16 - tag_bits) {
                4
            } else {
                2
            }
        };
        let type_refs = self.preceding_type_refs.unwrap_or(0);

        let mut tables = vec![TableSpec::zeroed(TABLE_MODULE, 1, 2 + s + 3 * g)];

        if self.preceding_type_refs.is_some() {
            let resolution_scope = coded(2, type_refs);
            tables.push(TableSpec::zeroed(
                TABLE_TYPEREF,
                type_refs,
                resolution_scope + s + s,
            ));
        }

        tables.push(TableSpec::zeroed(
            TABLE_TYPEDEF,
            1,
            4 + s + s + coded(2, type_refs) + 2 + 2,
        ));

        if self.preceding_type_refs.is_some() {
            tables.push(TableSpec::zeroed(TABLE_METHODDEF, 1, 4 + 2 + 2 + s + b + 2));
            tables.push(TableSpec::zeroed(
                TABLE_MEMBERREF,
                1,
                coded(3, type_refs) + s + b,
            ));
            tables.push(TableSpec::zeroed(
                TABLE_CUSTOMATTRIBUTE,
                1,
                coded(5, type_refs) + 2 + b,
            ));
            tables.push(TableSpec::zeroed(TABLE_STANDALONESIG, 1, b));
        }

        tables.push(TableSpec::zeroed(TABLE_ASSEMBLY, 1, 16 + b + s + s));

        if !self.references.is_empty() {
            let mut data = Vec::new();
            for (reference, (name, culture)) in self.references.iter().zip(indexes) {
                let (major, minor, build, revision) = reference.version;
                for part in [major, minor, build, revision] {
                    data.extend_from_slice(&part.to_le_bytes());
                }
                data.extend_from_slice(&0u32.to_le_bytes());
                data.extend_from_slice(&[0u8; 2]);
                put_index(&mut data, *name, s);
                put_index(&mut data, *culture, s);
                data.extend_from_slice(&[0u8; 2]);
            }

            tables.push(TableSpec {
                bit: TABLE_ASSEMBLYREF,
                rows: self.references.len() as u32,
                data,
            });
        }

        if self.trailing_unknown_table {
            tables.push(TableSpec {
                bit: TABLE_UNKNOWN,
                rows: 1,
                data: vec![0xAB; 4],
            });
        }

        let valid = tables
            .iter()
            .fold(0u64, |valid, table| valid | (1u64 << table.bit));

        let mut stream = Vec::new();
        stream.extend_from_slice(&0u32.to_le_bytes());
        stream.push(2);
        stream.push(0);
        stream.push(if self.large_strings { 0x01 } else { 0x00 });
        stream.push(1);
        stream.extend_from_slice(&valid.to_le_bytes());
        stream.extend_from_slice(&0u64.to_le_bytes());
        for table in &tables {
            stream.extend_from_slice(&table.rows.to_le_bytes());
        }
        for table in &tables {
            stream.extend_from_slice(&table.data);
        }

        stream
    }
}

fn align(value: usize, alignment: usize) -> usize {
    value.div_ceil(alignment) * alignment
}

fn put_u16(buffer: &mut [u8], offset: usize, value: u16) {
    buffer[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(buffer: &mut [u8], offset: usize, value: u32) {
    buffer[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn put_u64(buffer: &mut [u8], offset: usize, value: u64) {
    buffer[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

fn put_index(buffer: &mut Vec<u8>, value: u32, width: usize) {
    if width == 4 {
        buffer.extend_from_slice(&value.to_le_bytes());
    } else {
        buffer.extend_from_slice(&(value as u16).to_le_bytes());
    }
}
