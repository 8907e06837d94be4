//! Opaque GPU object names. Zero is never a live object.

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name(u32);

        impl $name {
            pub const INVALID: Self = Self(0);

            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            pub const fn raw(self) -> u32 {
                self.0
            }

            pub const fn is_valid(self) -> bool {
                self.0 != 0
            }
        }
    };
}

gpu_handle!(
    /// Vertex attribute or index buffer.
    BufferHandle
);
gpu_handle!(TextureHandle);
gpu_handle!(
    /// Single shader stage, only alive while a program is being built.
    ShaderHandle
);
gpu_handle!(ProgramHandle);

/// Location of an active uniform inside the currently bound program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UniformLocation(u32);

impl UniformLocation {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}
