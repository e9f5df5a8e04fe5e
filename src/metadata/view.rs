//! Parsed metadata view of a single image.
//!
//! [`AssemblyView`] owns the loaded [`File`] and keeps the CLI header, the metadata root, the
//! tables stream header and the `#Strings` heap as views into it. Nothing is copied out of the
//! image until [`AssemblyView::assembly_refs`] resolves the reference rows.

use ouroboros::self_referencing;
use std::{path::Path, sync::Arc};

use crate::{
    file::File,
    metadata::{
        cor20header::{Cor20Header, COR20_HEADER_SIZE},
        references::AssemblyReference,
        root::Root,
        streams::{StreamHeader, Strings, TablesHeader},
        tables::AssemblyRefRaw,
    },
    Result,
};

/// The parts of an image that reference discovery reads.
pub struct AssemblyViewData<'a> {
    /// The CLI header
    pub cor20header: Cor20Header,
    /// The metadata root with its stream directory
    pub metadata_root: Root,
    /// The `#~` / `#-` stream, if present
    pub metadata_tables: Option<TablesHeader<'a>>,
    /// The `#Strings` heap, if present
    pub strings: Option<Strings<'a>>,
}

impl<'a> AssemblyViewData<'a> {
    /// Locates and parses the metadata of `file`.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotManaged`] if the image has no CLI header, and a malformed
    /// error if any structure on the way to the streams is damaged.
    pub fn from_file(file: &'a File) -> Result<Self> {
        let (clr_rva, clr_size) = file.clr()?;
        if clr_size < COR20_HEADER_SIZE {
            return Err(malformed_error!(
                "CLR runtime header directory too small - {}",
                clr_size
            ));
        }

        let clr_offset = file.rva_to_offset(clr_rva)?;
        let cor20header = Cor20Header::read(file.data_slice(clr_offset, COR20_HEADER_SIZE)?)?;

        let metadata_offset = file.rva_to_offset(cor20header.metadata.rva as usize)?;
        let metadata = file.data_slice(metadata_offset, cor20header.metadata.size as usize)?;

        let metadata_root = Root::read(metadata)?;

        let mut metadata_tables = None;
        let mut strings = None;
        for stream in &metadata_root.streams {
            let start = stream.offset as usize;
            let stream_data = &metadata[start..start + stream.size as usize];

            match stream.name.as_str() {
                "#~" | "#-" if metadata_tables.is_none() => {
                    metadata_tables = Some(TablesHeader::from(stream_data)?);
                }
                "#Strings" if strings.is_none() => {
                    strings = Some(Strings::from(stream_data)?);
                }
                _ => {}
            }
        }

        Ok(AssemblyViewData {
            cor20header,
            metadata_root,
            metadata_tables,
            strings,
        })
    }

    /// Resolves every `AssemblyRef` row, in table order.
    ///
    /// # Errors
    /// Returns a malformed error if the tables stream is missing, the rows run past it, or a
    /// name cannot be read from `#Strings`.
    pub fn assembly_refs(&self) -> Result<Vec<AssemblyReference>> {
        let Some(tables) = &self.metadata_tables else {
            return Err(malformed_error!("Image has no metadata tables stream"));
        };

        let Some(table) = tables.table::<AssemblyRefRaw>()? else {
            return Ok(Vec::new());
        };

        if table.row_count() == 0 {
            return Ok(Vec::new());
        }

        let Some(strings) = &self.strings else {
            return Err(malformed_error!(
                "AssemblyRef table has {} rows but there is no #Strings heap",
                table.row_count()
            ));
        };

        table.iter().map(|row| row.to_reference(strings)).collect()
    }
}

#[self_referencing]
/// The metadata of one image, parsed just far enough to read its assembly references.
///
/// # Examples
///
/// ```rust,no_run
/// use asmrefs::AssemblyView;
/// use std::path::Path;
///
/// let view = AssemblyView::from_file(Path::new("Sandbox.Game.dll"))?;
/// println!("runtime {}", view.metadata_root().version);
/// for name in view.references()? {
///     println!("{}", name);
/// }
/// # Ok::<(), asmrefs::Error>(())
/// ```
pub struct AssemblyView {
    file: Arc<File>,
    #[borrows(file)]
    #[not_covariant]
    data: AssemblyViewData<'this>,
}

impl AssemblyView {
    /// Loads and parses the image at `file`.
    ///
    /// # Errors
    /// Returns [`crate::Error::NotFound`] or [`crate::Error::FileError`] if the file cannot be
    /// read, [`crate::Error::NotManaged`] for images without a CLI header, and a malformed
    /// error for damaged images.
    pub fn from_file(file: &Path) -> Result<Self> {
        let input = Arc::new(File::from_file(file)?);
        Self::load(input)
    }

    /// Parses an image held in memory.
    ///
    /// # Errors
    /// See [`AssemblyView::from_file`].
    pub fn from_mem(data: Vec<u8>) -> Result<Self> {
        let input = Arc::new(File::from_mem(data)?);
        Self::load(input)
    }

    fn load(file: Arc<File>) -> Result<Self> {
        AssemblyView::try_new(file, |file| AssemblyViewData::from_file(file))
    }

    /// Returns the CLI header.
    #[must_use]
    pub fn cor20header(&self) -> &Cor20Header {
        self.with_data(|data| &data.cor20header)
    }

    /// Returns the metadata root.
    #[must_use]
    pub fn metadata_root(&self) -> &Root {
        self.with_data(|data| &data.metadata_root)
    }

    /// Returns the stream headers of the metadata root.
    #[must_use]
    pub fn streams(&self) -> &[StreamHeader] {
        self.with_data(|data| &data.metadata_root.streams)
    }

    /// Returns the tables stream header, if the image has one.
    #[must_use]
    pub fn tables(&self) -> Option<&TablesHeader> {
        self.with_data(|data| data.metadata_tables.as_ref())
    }

    /// Returns the `#Strings` heap, if the image has one.
    #[must_use]
    pub fn strings(&self) -> Option<&Strings> {
        self.with_data(|data| data.strings.as_ref())
    }

    /// Returns the underlying file.
    #[must_use]
    pub fn file(&self) -> &Arc<File> {
        self.borrow_file()
    }

    /// Returns the `AssemblyRef` rows with their names, versions and cultures resolved.
    ///
    /// # Errors
    /// See [`AssemblyViewData::assembly_refs`].
    pub fn assembly_refs(&self) -> Result<Vec<AssemblyReference>> {
        self.with_data(|data| data.assembly_refs())
    }

    /// Returns the referenced assembly names in table order.
    ///
    /// # Errors
    /// See [`AssemblyViewData::assembly_refs`].
    pub fn references(&self) -> Result<Vec<String>> {
        Ok(self
            .assembly_refs()?
            .into_iter()
            .map(|reference| reference.name)
            .collect())
    }
}
