//! The `AssemblyRef` table (0x23).
//!
//! One row per external assembly the module was compiled against, in the order the compiler
//! emitted them. See ECMA-335 II.22.5.

use bitflags::bitflags;

use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        references::AssemblyReference,
        streams::Strings,
        tables::{RowDefinition, TableId, TableInfoRef},
    },
    Result,
};

bitflags! {
    /// `AssemblyFlags` of a reference row (II.23.1.2).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AssemblyFlags : u32 {
        /// `public_key_or_token` holds a full public key rather than a token
        const PUBLIC_KEY = 0x0001;
        /// Any assembly of the same name may be bound at runtime
        const RETARGETABLE = 0x0100;
        /// Windows Runtime content
        const WINDOWS_RUNTIME = 0x0200;
        /// Reserved
        const DISABLE_JIT_COMPILE_OPTIMIZER = 0x4000;
        /// Reserved
        const ENABLE_JIT_COMPILE_TRACKING = 0x8000;
    }
}

/// One `AssemblyRef` row with its heap indexes still unresolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssemblyRefRaw {
    /// 1-based row id
    pub rid: u32,
    /// Major, minor, build and revision number
    pub version: (u16, u16, u16, u16),
    /// Raw flags
    pub flags: AssemblyFlags,
    /// `#Blob` index of the public key or token
    pub public_key_or_token: u32,
    /// `#Strings` index of the simple name
    pub name: u32,
    /// `#Strings` index of the culture, 0 when neutral
    pub culture: u32,
    /// `#Blob` index of the hash
    pub hash_value: u32,
}

impl AssemblyRefRaw {
    /// Looks the name and culture of this row up in `strings`.
    ///
    /// # Errors
    /// Fails if either index points outside the heap or at a string that is not valid UTF-8.
    pub fn to_reference(&self, strings: &Strings) -> Result<AssemblyReference> {
        let culture = match self.culture {
            0 => None,
            index => Some(strings.get(index as usize)?.to_string()),
        };

        Ok(AssemblyReference {
            name: strings.get(self.name as usize)?.to_string(),
            version: self.version,
            culture,
            flags: self.flags,
        })
    }
}

impl<'a> RowDefinition<'a> for AssemblyRefRaw {
    const TABLE_ID: TableId = TableId::AssemblyRef;

    fn row_size(sizes: &TableInfoRef) -> u32 {
        let heaps = 2 * u32::from(sizes.blob_bytes()) + 2 * u32::from(sizes.str_bytes());
        4 * 2 + 4 + heaps
    }

    fn read_row(
        data: &'a [u8],
        offset: &mut usize,
        rid: u32,
        sizes: &TableInfoRef,
    ) -> Result<Self> {
        let version = (
            read_le_at::<u16>(data, offset)?,
            read_le_at::<u16>(data, offset)?,
            read_le_at::<u16>(data, offset)?,
            read_le_at::<u16>(data, offset)?,
        );
        let flags = AssemblyFlags::from_bits_retain(read_le_at::<u32>(data, offset)?);

        Ok(AssemblyRefRaw {
            rid,
            version,
            flags,
            public_key_or_token: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
            name: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            culture: read_le_at_dyn(data, offset, sizes.is_large_str())?,
            hash_value: read_le_at_dyn(data, offset, sizes.is_large_blob())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::tables::{HeapSizes, MetadataTable, TableInfo};

    fn sizes(rows: u32, heaps: HeapSizes) -> TableInfoRef {
        Arc::new(TableInfo::new_test(&[(TableId::AssemblyRef, rows)], heaps))
    }

    #[test]
    fn narrow_heap_indexes() {
        #[rustfmt::skip]
        let data = [
            0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 4.0.0.0
            0x01, 0x00, 0x00, 0x00,                         // PUBLIC_KEY
            0x2A, 0x00,
            0x10, 0x00,
            0x00, 0x00,
            0x3C, 0x00,
            0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x04, 0x00, // 1.2.3.4
            0x00, 0x01, 0x00, 0x00,                         // RETARGETABLE
            0x00, 0x00,
            0x20, 0x00,
            0x28, 0x00,
            0x00, 0x00,
        ];
        let sizes = sizes(2, HeapSizes::empty());
        assert_eq!(AssemblyRefRaw::row_size(&sizes), 20);
        assert_eq!(TableId::AssemblyRef.row_size(&sizes), 20);

        let table = MetadataTable::<AssemblyRefRaw>::new(&data, 2, sizes).unwrap();
        let rows: Vec<_> = table.iter().collect();

        assert_eq!(
            rows[0],
            AssemblyRefRaw {
                rid: 1,
                version: (4, 0, 0, 0),
                flags: AssemblyFlags::PUBLIC_KEY,
                public_key_or_token: 0x2A,
                name: 0x10,
                culture: 0,
                hash_value: 0x3C,
            }
        );
        assert_eq!(rows[1].rid, 2);
        assert_eq!(rows[1].version, (1, 2, 3, 4));
        assert_eq!(rows[1].flags, AssemblyFlags::RETARGETABLE);
        assert_eq!((rows[1].name, rows[1].culture), (0x20, 0x28));

        assert_eq!(table.get(2), Some(rows[1].clone()));
        assert!(table.get(0).is_none());
        assert!(table.get(3).is_none());
    }

    #[test]
    fn wide_heap_indexes() {
        let mut data = vec![0u8; 28];
        data[0] = 9;
        data[16..20].copy_from_slice(&0x0001_0000u32.to_le_bytes());
        data[24..28].copy_from_slice(&0xDEAD_BEEFu32.to_le_bytes());

        let sizes = sizes(1, HeapSizes::LARGE_STRINGS | HeapSizes::LARGE_BLOB);
        assert_eq!(AssemblyRefRaw::row_size(&sizes), 28);

        let row = MetadataTable::<AssemblyRefRaw>::new(&data, 1, sizes)
            .unwrap()
            .get(1)
            .unwrap();
        assert_eq!(row.version, (9, 0, 0, 0));
        assert_eq!(row.name, 0x0001_0000);
        assert_eq!(row.hash_value, 0xDEAD_BEEF);
    }

    #[test]
    fn rows_past_data() {
        let data = [0u8; 39];
        let sizes = sizes(2, HeapSizes::empty());

        assert!(MetadataTable::<AssemblyRefRaw>::new(&data, 2, sizes.clone()).is_err());
        assert_eq!(
            MetadataTable::<AssemblyRefRaw>::new(&data, 1, sizes)
                .unwrap()
                .iter()
                .count(),
            1
        );
    }

    #[test]
    fn to_reference() {
        let strings = Strings::from(b"\0VRage.Game\0de-DE\0").unwrap();
        let row = AssemblyRefRaw {
            rid: 1,
            version: (1, 0, 0, 0),
            flags: AssemblyFlags::PUBLIC_KEY | AssemblyFlags::RETARGETABLE,
            public_key_or_token: 0,
            name: 1,
            culture: 0,
            hash_value: 0,
        };

        let reference = row.to_reference(&strings).unwrap();
        assert_eq!(reference.name, "VRage.Game");
        assert_eq!(reference.version, (1, 0, 0, 0));
        assert_eq!(reference.culture, None);
        assert!(reference.flags.contains(AssemblyFlags::RETARGETABLE));

        let localized = AssemblyRefRaw { culture: 12, ..row.clone() };
        assert_eq!(
            localized.to_reference(&strings).unwrap().culture.as_deref(),
            Some("de-DE")
        );

        let dangling = AssemblyRefRaw { name: 0x100, ..row };
        assert!(dangling.to_reference(&strings).is_err());
    }
}
