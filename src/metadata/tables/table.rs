use std::marker::PhantomData;

use crate::{
    metadata::tables::{TableId, TableInfoRef},
    Error::OutOfBounds,
    Result,
};

/// Decoding of the rows of one table.
pub trait RowDefinition<'a>: Sized {
    /// Table this row type belongs to.
    const TABLE_ID: TableId;

    /// Row width under the index widths in `sizes`.
    fn row_size(sizes: &TableInfoRef) -> u32;

    /// Decodes the row at `*offset` in `data` and moves `offset` past it. `rid` is the 1-based
    /// row id recorded in the result.
    ///
    /// # Errors
    /// [`crate::Error::OutOfBounds`] if the row does not fit into `data`.
    fn read_row(data: &'a [u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef)
        -> Result<Self>;
}

/// Rows of one table, validated to lie inside the tables stream.
pub struct MetadataTable<'a, T> {
    data: &'a [u8],
    row_count: u32,
    row_size: usize,
    sizes: TableInfoRef,
    _row: PhantomData<T>,
}

impl<'a, T: RowDefinition<'a>> MetadataTable<'a, T> {
    /// Views the first `row_count` rows of `data`.
    ///
    /// # Errors
    /// [`crate::Error::OutOfBounds`] if `data` is shorter than `row_count` rows.
    pub fn new(data: &'a [u8], row_count: u32, sizes: TableInfoRef) -> Result<Self> {
        let row_size = T::row_size(&sizes) as usize;
        let data = row_size
            .checked_mul(row_count as usize)
            .and_then(|size| data.get(..size))
            .ok_or(OutOfBounds)?;

        Ok(MetadataTable {
            data,
            row_count,
            row_size,
            sizes,
            _row: PhantomData,
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Width of one row in bytes.
    #[must_use]
    pub fn row_size(&self) -> usize {
        self.row_size
    }

    /// The row with 1-based id `rid`.
    #[must_use]
    pub fn get(&self, rid: u32) -> Option<T> {
        if rid == 0 || rid > self.row_count {
            return None;
        }

        let mut offset = (rid as usize - 1) * self.row_size;
        T::read_row(self.data, &mut offset, rid, &self.sizes).ok()
    }

    /// Rows in table order.
    pub fn iter(&self) -> TableIterator<'_, 'a, T> {
        TableIterator {
            table: self,
            next_rid: 1,
            offset: 0,
        }
    }
}

impl<'t, 'a, T: RowDefinition<'a>> IntoIterator for &'t MetadataTable<'a, T> {
    type Item = T;
    type IntoIter = TableIterator<'t, 'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator returned by [`MetadataTable::iter`].
pub struct TableIterator<'t, 'a, T> {
    table: &'t MetadataTable<'a, T>,
    next_rid: u32,
    offset: usize,
}

impl<'a, T: RowDefinition<'a>> Iterator for TableIterator<'_, 'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.next_rid > self.table.row_count {
            return None;
        }

        let row = T::read_row(
            self.table.data,
            &mut self.offset,
            self.next_rid,
            &self.table.sizes,
        )
        .ok()?;
        self.next_rid += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.table.row_count + 1 - self.next_rid) as usize;
        (left, Some(left))
    }
}
