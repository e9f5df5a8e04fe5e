//! Metadata tables of the `#~` stream.
//!
//! The tables stream stores up to 64 logical tables back to back, each a run of fixed-size rows.
//! Row sizes are not fixed across images: heap indexes, simple table indexes and coded indexes
//! are 2 or 4 bytes wide depending on heap sizes and row counts. Finding the `AssemblyRef` table
//! therefore requires the column layout of every table that precedes it.
//!
//! # Key Components
//!
//! - [`TableId`] - The logical tables defined by ECMA-335, keyed by their bit in the `valid` mask
//! - [`TableInfo`] - Row counts and index widths of one tables stream
//! - [`CodedIndexType`] - The coded index families and their candidate tables
//! - [`RowDefinition`] / [`MetadataTable`] - Typed, bounds-checked access to the rows of a table
//! - [`AssemblyRefRaw`] - The raw `AssemblyRef` row
//!
//! # References
//! - [ECMA-335 II.22](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - Metadata logical format: tables
//! - [ECMA-335 II.24.2.6](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf) - `#~` stream

mod assemblyref;
mod codedindex;
mod layout;
mod table;
mod tableinfo;

pub use assemblyref::{AssemblyFlags, AssemblyRefRaw};
pub use codedindex::CodedIndexType;
pub use table::{MetadataTable, RowDefinition, TableIterator};
pub use tableinfo::{HeapSizes, TableInfo, TableInfoRef, TableRowInfo};

use strum::{EnumCount, EnumIter, IntoEnumIterator};

/// Identifier of a metadata table; the discriminant is the table's bit in the `valid` mask.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount,
)]
#[repr(u8)]
pub enum TableId {
    /// `Module` table (0x00)
    Module = 0x00,
    /// `TypeRef` table (0x01)
    TypeRef = 0x01,
    /// `TypeDef` table (0x02)
    TypeDef = 0x02,
    /// `FieldPtr` table (0x03), only in uncompressed `#-` streams
    FieldPtr = 0x03,
    /// `Field` table (0x04)
    Field = 0x04,
    /// `MethodPtr` table (0x05), only in uncompressed `#-` streams
    MethodPtr = 0x05,
    /// `MethodDef` table (0x06)
    MethodDef = 0x06,
    /// `ParamPtr` table (0x07), only in uncompressed `#-` streams
    ParamPtr = 0x07,
    /// `Param` table (0x08)
    Param = 0x08,
    /// `InterfaceImpl` table (0x09)
    InterfaceImpl = 0x09,
    /// `MemberRef` table (0x0A)
    MemberRef = 0x0A,
    /// `Constant` table (0x0B)
    Constant = 0x0B,
    /// `CustomAttribute` table (0x0C)
    CustomAttribute = 0x0C,
    /// `FieldMarshal` table (0x0D)
    FieldMarshal = 0x0D,
    /// `DeclSecurity` table (0x0E)
    DeclSecurity = 0x0E,
    /// `ClassLayout` table (0x0F)
    ClassLayout = 0x0F,
    /// `FieldLayout` table (0x10)
    FieldLayout = 0x10,
    /// `StandAloneSig` table (0x11)
    StandAloneSig = 0x11,
    /// `EventMap` table (0x12)
    EventMap = 0x12,
    /// `EventPtr` table (0x13), only in uncompressed `#-` streams
    EventPtr = 0x13,
    /// `Event` table (0x14)
    Event = 0x14,
    /// `PropertyMap` table (0x15)
    PropertyMap = 0x15,
    /// `PropertyPtr` table (0x16), only in uncompressed `#-` streams
    PropertyPtr = 0x16,
    /// `Property` table (0x17)
    Property = 0x17,
    /// `MethodSemantics` table (0x18)
    MethodSemantics = 0x18,
    /// `MethodImpl` table (0x19)
    MethodImpl = 0x19,
    /// `ModuleRef` table (0x1A)
    ModuleRef = 0x1A,
    /// `TypeSpec` table (0x1B)
    TypeSpec = 0x1B,
    /// `ImplMap` table (0x1C)
    ImplMap = 0x1C,
    /// `FieldRVA` table (0x1D)
    FieldRVA = 0x1D,
    /// `EncLog` table (0x1E)
    EncLog = 0x1E,
    /// `EncMap` table (0x1F)
    EncMap = 0x1F,
    /// `Assembly` table (0x20)
    Assembly = 0x20,
    /// `AssemblyProcessor` table (0x21)
    AssemblyProcessor = 0x21,
    /// `AssemblyOS` table (0x22)
    AssemblyOS = 0x22,
    /// `AssemblyRef` table (0x23)
    AssemblyRef = 0x23,
    /// `AssemblyRefProcessor` table (0x24)
    AssemblyRefProcessor = 0x24,
    /// `AssemblyRefOS` table (0x25)
    AssemblyRefOS = 0x25,
    /// `File` table (0x26)
    File = 0x26,
    /// `ExportedType` table (0x27)
    ExportedType = 0x27,
    /// `ManifestResource` table (0x28)
    ManifestResource = 0x28,
    /// `NestedClass` table (0x29)
    NestedClass = 0x29,
    /// `GenericParam` table (0x2A)
    GenericParam = 0x2A,
    /// `MethodSpec` table (0x2B)
    MethodSpec = 0x2B,
    /// `GenericParamConstraint` table (0x2C)
    GenericParamConstraint = 0x2C,
}

impl TableId {
    /// Looks up the table assigned to a bit of the `valid` mask.
    ///
    /// Returns `None` for bits ECMA-335 leaves unassigned or assigns to Portable PDB tables.
    #[must_use]
    pub fn from_bit(bit: u8) -> Option<TableId> {
        TableId::iter().find(|id| *id as u8 == bit)
    }

    /// Bit mask of this table in the `valid` vector.
    #[must_use]
    pub fn mask(self) -> u64 {
        1u64 << (self as u8)
    }
}
