//! Schema-described reads of vertex attributes and indices from raw buffer
//! bytes. Every read is driven by the accessor's own metadata; nothing here
//! knows about a particular asset.

use std::fmt;

use crate::engine::error::AssetError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentType {
    U8,
    U16,
    U32,
    F32,
    Other,
}

impl ComponentType {
    pub fn size(self) -> usize {
        match self {
            ComponentType::U8 => 1,
            ComponentType::U16 => 2,
            ComponentType::U32 | ComponentType::F32 => 4,
            ComponentType::Other => 0,
        }
    }
}

impl From<gltf::accessor::DataType> for ComponentType {
    fn from(data_type: gltf::accessor::DataType) -> Self {
        use gltf::accessor::DataType;
        match data_type {
            DataType::U8 => ComponentType::U8,
            DataType::U16 => ComponentType::U16,
            DataType::U32 => ComponentType::U32,
            DataType::F32 => ComponentType::F32,
            DataType::I8 | DataType::I16 => ComponentType::Other,
        }
    }
}

/// Where and how one attribute stream lives inside a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessorLayout {
    /// Number of elements.
    pub count: usize,
    /// Byte offset of the first element inside the buffer.
    pub offset: usize,
    /// Distance in bytes between consecutive elements. Equal to the element
    /// size for tightly packed data.
    pub stride: usize,
    pub component: ComponentType,
    /// Components per element (1 for scalars, 3 for vec3, ...).
    pub dimensions: usize,
}

impl AccessorLayout {
    pub fn packed(count: usize, offset: usize, component: ComponentType, dimensions: usize) -> Self {
        Self {
            count,
            offset,
            stride: component.size() * dimensions,
            component,
            dimensions,
        }
    }

    pub fn element_size(&self) -> usize {
        self.component.size() * self.dimensions
    }

    /// Layout of a glTF accessor, view offset and stride included.
    pub fn from_gltf(accessor: &gltf::Accessor) -> Result<(Self, usize), AssetError> {
        if accessor.sparse().is_some() {
            return Err(AssetError::SparseAccessor(accessor.index()));
        }
        let view = accessor.view().ok_or(AssetError::MissingBufferView(accessor.index()))?;
        let component = ComponentType::from(accessor.data_type());
        let dimensions = accessor.dimensions().multiplicity();
        let element_size = component.size() * dimensions;

        let layout = Self {
            count: accessor.count(),
            offset: view.offset() + accessor.offset(),
            stride: view.stride().unwrap_or(element_size),
            component,
            dimensions,
        };
        Ok((layout, view.buffer().index()))
    }

    fn expect(&self, attribute: &'static str, component: ComponentType, dimensions: usize) -> Result<(), AssetError> {
        if self.component == component && self.dimensions == dimensions {
            return Ok(());
        }
        Err(AssetError::UnexpectedLayout {
            attribute,
            expected: LayoutName(component, dimensions).to_string(),
            found: LayoutName(self.component, self.dimensions).to_string(),
        })
    }

    fn check_bounds(&self, buffer: &[u8]) -> Result<(), AssetError> {
        if self.count == 0 {
            return Ok(());
        }
        let start = self.offset;
        let end = (self.count - 1)
            .checked_mul(self.stride)
            .and_then(|span| span.checked_add(self.offset))
            .and_then(|last| last.checked_add(self.element_size()))
            .unwrap_or(usize::MAX);
        if end > buffer.len() {
            return Err(AssetError::AccessorOutOfBounds {
                start,
                end,
                len: buffer.len(),
            });
        }
        Ok(())
    }

    fn elements<'a>(&self, buffer: &'a [u8]) -> impl Iterator<Item = &'a [u8]> + 'a {
        let Self { count, offset, stride, .. } = *self;
        let size = self.element_size();
        (0..count).map(move |i| &buffer[offset + i * stride..offset + i * stride + size])
    }
}

struct LayoutName(ComponentType, usize);

impl fmt::Display for LayoutName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}x{}", self.0, self.1)
    }
}

/// Reads `count` f32 vectors of `N` components. Handles interleaved and
/// unaligned data.
pub fn read_vectors<const N: usize>(attribute: &'static str, buffer: &[u8], layout: &AccessorLayout) -> Result<Vec<[f32; N]>, AssetError>
where
    [f32; N]: bytemuck::Pod,
{
    layout.expect(attribute, ComponentType::F32, N)?;
    layout.check_bounds(buffer)?;
    Ok(layout.elements(buffer).map(bytemuck::pod_read_unaligned::<[f32; N]>).collect())
}

/// Reads scalar indices of any unsigned width into u16.
pub fn read_indices(buffer: &[u8], layout: &AccessorLayout) -> Result<Vec<u16>, AssetError> {
    if layout.dimensions != 1 || !matches!(layout.component, ComponentType::U8 | ComponentType::U16 | ComponentType::U32) {
        return Err(AssetError::UnexpectedLayout {
            attribute: "indices",
            expected: "unsigned scalar".to_string(),
            found: LayoutName(layout.component, layout.dimensions).to_string(),
        });
    }
    layout.check_bounds(buffer)?;

    layout
        .elements(buffer)
        .map(|bytes| match layout.component {
            ComponentType::U8 => Ok(u16::from(bytes[0])),
            ComponentType::U16 => Ok(bytemuck::pod_read_unaligned::<u16>(bytes)),
            _ => {
                let index = bytemuck::pod_read_unaligned::<u32>(bytes);
                u16::try_from(index).map_err(|_| AssetError::IndexOverflow(index))
            }
        })
        .collect()
}
