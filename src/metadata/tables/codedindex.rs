//! Coded index families (ECMA-335 II.24.2.6).
//!
//! A coded index packs a tag selecting one of several candidate tables into its low bits and the
//! row id into the rest. It is 2 bytes wide unless the largest candidate table has too many rows
//! for the remaining bits, and that width is the only thing this crate needs them for.

use strum::{EnumCount, EnumIter};

use crate::metadata::tables::TableId;

/// All coded index kinds used by the tables up to and including `GenericParamConstraint`.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, EnumIter, EnumCount)]
#[repr(usize)]
pub enum CodedIndexType {
    /// `TypeDef`, `TypeRef`, `TypeSpec`
    TypeDefOrRef,
    /// `Field`, `Param`, `Property`
    HasConstant,
    /// Any table that can carry a custom attribute
    HasCustomAttribute,
    /// `Field`, `Param`
    HasFieldMarshal,
    /// `TypeDef`, `MethodDef`, `Assembly`
    HasDeclSecurity,
    /// `TypeDef`, `TypeRef`, `ModuleRef`, `MethodDef`, `TypeSpec`
    MemberRefParent,
    /// `Event`, `Property`
    HasSemantics,
    /// `MethodDef`, `MemberRef`
    MethodDefOrRef,
    /// `Field`, `MethodDef`
    MemberForwarded,
    /// `File`, `AssemblyRef`, `ExportedType`
    Implementation,
    /// `MethodDef`, `MemberRef` (tags 0, 1 and 4 are unused)
    CustomAttributeType,
    /// `Module`, `ModuleRef`, `AssemblyRef`, `TypeRef`
    ResolutionScope,
    /// `TypeDef`, `MethodDef`
    TypeOrMethodDef,
}

impl CodedIndexType {
    /// The tables addressed by this coded index, in tag order.
    #[must_use]
    #[rustfmt::skip]
    pub fn tables(&self) -> &'static [TableId] {
        use crate::metadata::tables::TableId as T;

        match self {
            Self::TypeDefOrRef => &[T::TypeDef, T::TypeRef, T::TypeSpec],
            Self::HasConstant => &[T::Field, T::Param, T::Property],
            // Tag 8 is called `Permission` in II.24.2.6 and addresses `DeclSecurity`
            Self::HasCustomAttribute => &[
                T::MethodDef, T::Field, T::TypeRef, T::TypeDef, T::Param, T::InterfaceImpl,
                T::MemberRef, T::Module, T::DeclSecurity, T::Property, T::Event, T::StandAloneSig,
                T::ModuleRef, T::TypeSpec, T::Assembly, T::AssemblyRef, T::File, T::ExportedType,
                T::ManifestResource, T::GenericParam, T::GenericParamConstraint, T::MethodSpec,
            ],
            Self::HasFieldMarshal => &[T::Field, T::Param],
            Self::HasDeclSecurity => &[T::TypeDef, T::MethodDef, T::Assembly],
            Self::MemberRefParent => &[T::TypeDef, T::TypeRef, T::ModuleRef, T::MethodDef, T::TypeSpec],
            Self::HasSemantics => &[T::Event, T::Property],
            Self::MethodDefOrRef => &[T::MethodDef, T::MemberRef],
            Self::MemberForwarded => &[T::Field, T::MethodDef],
            Self::Implementation => &[T::File, T::AssemblyRef, T::ExportedType],
            // Only tags 2 and 3 are used; the unused slots still count towards the tag width
            Self::CustomAttributeType => &[T::MethodDef, T::MethodDef, T::MethodDef, T::MemberRef, T::MemberRef],
            Self::ResolutionScope => &[T::Module, T::ModuleRef, T::AssemblyRef, T::TypeRef],
            Self::TypeOrMethodDef => &[T::TypeDef, T::MethodDef],
        }
    }

    /// Number of low bits holding the tag.
    #[must_use]
    pub fn tag_bits(&self) -> u8 {
        let mut bits = 0;
        while (1usize << bits) < self.tables().len() {
            bits += 1;
        }
        bits
    }
}
