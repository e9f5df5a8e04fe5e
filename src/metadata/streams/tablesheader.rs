//! Header of the `#~` / `#-` tables stream.
//!
//! The header announces which tables are present through the 64-bit `valid` vector, carries one
//! row count per present table and the heap-size flags. The table rows follow it back to back,
//! in ascending table order, without any per-table framing.
//!
//! # Reference
//! - [ECMA-335 II.24.2.6](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use std::sync::Arc;

use strum::IntoEnumIterator;

use crate::{
    file::io::read_le_at,
    metadata::tables::{HeapSizes, MetadataTable, RowDefinition, TableId, TableInfo, TableInfoRef},
    Error::OutOfBounds,
    Result,
};

/// Size of the fixed part of the header, before the row counts.
const FIXED_HEADER_SIZE: usize = 24;

/// The parsed header of a tables stream, with access to the rows of individual tables.
///
/// # Examples
///
/// ```rust,ignore
/// use asmrefs::metadata::{streams::TablesHeader, tables::AssemblyRefRaw};
///
/// let tables = TablesHeader::from(tables_stream)?;
/// if let Some(assembly_refs) = tables.table::<AssemblyRefRaw>()? {
///     for row in &assembly_refs {
///         println!("name index: {}", row.name);
///     }
/// }
/// ```
pub struct TablesHeader<'a> {
    /// Major version of the table schema, shall be 2
    pub major_version: u8,
    /// Minor version of the table schema, shall be 0
    pub minor_version: u8,
    /// Flags for the heap index sizes
    pub heap_sizes: HeapSizes,
    /// Bit vector of present tables
    pub valid: u64,
    /// Bit vector of sorted tables
    pub sorted: u64,
    /// Row counts and index widths
    pub info: TableInfoRef,
    tables_offset: usize,
    data: &'a [u8],
}

/// Row count of one present table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    /// The table
    pub table_id: TableId,
    /// Its number of rows
    pub row_count: u32,
}

impl<'a> TablesHeader<'a> {
    /// Parses the header of a tables stream.
    ///
    /// A `valid` vector of zero is accepted and describes a stream without tables.
    ///
    /// # Arguments
    /// * 'data' - The complete tables stream
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the header or its row counts do not fit into
    /// `data`.
    pub fn from(data: &'a [u8]) -> Result<TablesHeader<'a>> {
        if data.len() < FIXED_HEADER_SIZE {
            return Err(OutOfBounds);
        }

        let mut offset = 4;
        let major_version = read_le_at::<u8>(data, &mut offset)?;
        let minor_version = read_le_at::<u8>(data, &mut offset)?;
        let heap_sizes = HeapSizes::from_bits_retain(read_le_at::<u8>(data, &mut offset)?);

        let mut offset = 8;
        let valid = read_le_at::<u64>(data, &mut offset)?;
        let sorted = read_le_at::<u64>(data, &mut offset)?;

        let info = Arc::new(TableInfo::new(data, valid)?);

        let mut tables_offset = FIXED_HEADER_SIZE + valid.count_ones() as usize * 4;
        if heap_sizes.contains(HeapSizes::EXTRA_DATA) {
            tables_offset += 4;
        }

        if tables_offset > data.len() {
            return Err(OutOfBounds);
        }

        Ok(TablesHeader {
            major_version,
            minor_version,
            heap_sizes,
            valid,
            sorted,
            info,
            tables_offset,
            data,
        })
    }

    /// Number of tables announced in the `valid` vector.
    #[must_use]
    pub fn table_count(&self) -> u32 {
        self.valid.count_ones()
    }

    /// Returns `true` if the table's bit is set in the `valid` vector.
    #[must_use]
    pub fn has_table(&self, table_id: TableId) -> bool {
        self.valid & table_id.mask() != 0
    }

    /// Offset of the first row of a table, relative to the start of the stream.
    ///
    /// Computed by adding up the sizes of all present tables with a lower id.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the accumulated size overflows.
    pub fn table_offset(&self, table_id: TableId) -> Result<usize> {
        let mut offset = self.tables_offset;

        for preceding in TableId::iter().take_while(|id| *id < table_id) {
            if !self.has_table(preceding) {
                continue;
            }

            let size = u64::from(self.info.get(preceding).rows)
                * u64::from(preceding.row_size(&self.info));

            offset = usize::try_from(size)
                .ok()
                .and_then(|size| offset.checked_add(size))
                .ok_or_else(|| {
                    malformed_error!("Table {:?} causes the table offset to overflow", preceding)
                })?;
        }

        Ok(offset)
    }

    /// Returns a typed view of the rows of table `T`, or `None` if the table is not present.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the rows run past the end of the stream.
    pub fn table<T: RowDefinition<'a>>(&self) -> Result<Option<MetadataTable<'a, T>>> {
        if !self.has_table(T::TABLE_ID) {
            return Ok(None);
        }

        let offset = self.table_offset(T::TABLE_ID)?;
        if offset > self.data.len() {
            return Err(OutOfBounds);
        }

        let rows = self.info.get(T::TABLE_ID).rows;
        MetadataTable::new(&self.data[offset..], rows, self.info.clone()).map(Some)
    }

    /// Row counts of all present tables with a known [`TableId`], in table order.
    #[must_use]
    pub fn summary(&self) -> Vec<TableSummary> {
        TableId::iter()
            .filter(|id| self.has_table(*id))
            .map(|table_id| TableSummary {
                table_id,
                row_count: self.info.get(table_id).rows,
            })
            .collect()
    }
}
