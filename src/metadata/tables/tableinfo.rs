use std::sync::Arc;

use bitflags::bitflags;
use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::read_le_at,
    metadata::tables::{CodedIndexType, TableId},
    Result,
};

/// Number of bits in the `valid` vector, and therefore the number of addressable tables.
pub const MAX_TABLES: usize = 64;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// The `HeapSizes` byte of the tables stream header
    pub struct HeapSizes : u8 {
        /// Indexes into the `#Strings` heap are 4 bytes wide
        const LARGE_STRINGS = 0x01;
        /// Indexes into the `#GUID` heap are 4 bytes wide
        const LARGE_GUID = 0x02;
        /// Indexes into the `#Blob` heap are 4 bytes wide
        const LARGE_BLOB = 0x04;
        /// Padding bit, set by some writers
        const PADDING = 0x08;
        /// The stream only holds edit-and-continue deltas
        const DELTA_ONLY = 0x20;
        /// Four bytes of extra data follow the row counts
        const EXTRA_DATA = 0x40;
        /// Rows may be marked as deleted
        const HAS_DELETE = 0x80;
    }
}

/// Row count of one table and the index width other tables use to point into it.
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct TableRowInfo {
    /// Rows declared in the header
    pub rows: u32,
    /// Significant bits of the largest row id, at least 1
    pub bits: u8,
    /// Simple indexes into this table take 4 bytes
    pub is_large: bool,
}

impl TableRowInfo {
    /// Derives the index widths for a table of `rows` rows.
    #[must_use]
    pub fn new(rows: u32) -> Self {
        let bits = u32::BITS - rows.leading_zeros();

        TableRowInfo {
            rows,
            bits: u8::try_from(bits.max(1)).unwrap_or(32),
            is_large: rows > 0xFFFF,
        }
    }
}

/// `TableInfo` holds the row counts of every table present in a tables stream and the resulting
/// widths of heap, table and coded indexes.
///
/// Row counts are kept per bit of the `valid` vector, including bits that do not map to a
/// [`TableId`], so that callers can walk the row-count array exactly as it is laid out on disk.
#[derive(Clone)]
pub struct TableInfo {
    rows: Vec<TableRowInfo>,
    coded_indexes: Vec<u8>,
    heap_sizes: HeapSizes,
}

/// Shared handle to a [`TableInfo`], held by every table view of one stream.
pub type TableInfoRef = Arc<TableInfo>;

impl TableInfo {
    /// Reads the row-count array of the tables stream in `data`.
    ///
    /// One `u32` follows the 24-byte header for every bit set in `valid_bitvec`, lowest bit
    /// first, whether or not the bit names a known table.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the row-count array runs past `data`
    pub fn new(data: &[u8], valid_bitvec: u64) -> Result<Self> {
        let mut rows = vec![TableRowInfo::default(); MAX_TABLES];
        let mut next_row_offset = 24;

        for (bit, row_info) in rows.iter_mut().enumerate() {
            if valid_bitvec & (1u64 << bit) == 0 {
                continue;
            }

            let row_count = read_le_at::<u32>(data, &mut next_row_offset)?;
            *row_info = TableRowInfo::new(row_count);
        }

        let mut heap_size_offset = 6;
        let heap_sizes = HeapSizes::from_bits_retain(read_le_at::<u8>(data, &mut heap_size_offset)?);

        let mut table_info = TableInfo {
            rows,
            coded_indexes: vec![0; CodedIndexType::COUNT],
            heap_sizes,
        };

        table_info.calculate_coded_index_bits();

        Ok(table_info)
    }

    /// Builds the widths for the given row counts without a stream to parse.
    #[cfg(test)]
    pub fn new_test(valid_tables: &[(TableId, u32)], heap_sizes: HeapSizes) -> Self {
        let mut table_info = TableInfo {
            rows: vec![TableRowInfo::default(); MAX_TABLES],
            coded_indexes: vec![0; CodedIndexType::COUNT],
            heap_sizes,
        };

        for (table_id, row_count) in valid_tables {
            table_info.rows[*table_id as usize] = TableRowInfo::new(*row_count);
        }

        table_info.calculate_coded_index_bits();
        table_info
    }

    /// The heap size flags of the stream.
    #[must_use]
    pub fn heap_sizes(&self) -> HeapSizes {
        self.heap_sizes
    }

    /// Returns the row information for a specific table.
    #[must_use]
    pub fn get(&self, table: TableId) -> &TableRowInfo {
        &self.rows[table as usize]
    }

    /// Returns the row count recorded for a bit of the `valid` vector.
    #[must_use]
    pub fn rows_at_bit(&self, bit: usize) -> u32 {
        self.rows.get(bit).map_or(0, |info| info.rows)
    }

    /// Whether simple indexes into `id` take 4 bytes.
    #[must_use]
    pub fn is_large(&self, id: TableId) -> bool {
        self.get(id).is_large
    }

    /// Whether `#Strings` indexes take 4 bytes.
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.heap_sizes.contains(HeapSizes::LARGE_STRINGS)
    }

    /// Whether `#GUID` indexes take 4 bytes.
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.heap_sizes.contains(HeapSizes::LARGE_GUID)
    }

    /// Whether `#Blob` indexes take 4 bytes.
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.heap_sizes.contains(HeapSizes::LARGE_BLOB)
    }

    /// Width of a `#Strings` index.
    #[must_use]
    pub fn str_bytes(&self) -> u8 {
        index_width(self.is_large_str())
    }

    /// Width of a `#GUID` index.
    #[must_use]
    pub fn guid_bytes(&self) -> u8 {
        index_width(self.is_large_guid())
    }

    /// Width of a `#Blob` index.
    #[must_use]
    pub fn blob_bytes(&self) -> u8 {
        index_width(self.is_large_blob())
    }

    /// Bits needed for any row id of `table_id`.
    #[must_use]
    pub fn table_index_bits(&self, table_id: TableId) -> u8 {
        self.get(table_id).bits
    }

    /// Width of a simple index into `table_id`.
    #[must_use]
    pub fn table_index_bytes(&self, table_id: TableId) -> u8 {
        index_width(self.is_large(table_id))
    }

    /// Tag bits plus the row bits of the largest candidate table.
    #[must_use]
    pub fn coded_index_bits(&self, coded_index_type: CodedIndexType) -> u8 {
        self.coded_indexes[coded_index_type as usize]
    }

    /// Width of a coded index: 4 once its bits no longer fit 16.
    #[must_use]
    pub fn coded_index_bytes(&self, coded_index_type: CodedIndexType) -> u8 {
        index_width(self.coded_index_bits(coded_index_type) > 16)
    }

    fn calculate_coded_index_bits(&mut self) {
        for kind in CodedIndexType::iter() {
            let row_bits = kind
                .tables()
                .iter()
                .map(|table| self.table_index_bits(*table))
                .max()
                .unwrap_or(1);
            self.coded_indexes[kind as usize] = row_bits + kind.tag_bits();
        }
    }
}

fn index_width(large: bool) -> u8 {
    if large {
        4
    } else {
        2
    }
}
