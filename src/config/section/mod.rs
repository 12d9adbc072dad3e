//! Configuration section definitions.
//!
//! Each module corresponds to a section in `cpwatch.toml`:
//!
//! | Module       | TOML Section   | Purpose                              |
//! |--------------|----------------|--------------------------------------|
//! | `watch`      | `[watch]`      | Watch root, subdirectories, debounce |
//! | `serve`      | `[serve]`      | Control endpoint                     |
//! | `lang`       | `[lang]`       | Toolchains per language              |
//! | `template`   | `[template]`   | Problem templates, editor            |
//! | `precompile` | `[precompile]` | Precompiled header cache             |

mod lang;
mod precompile;
mod serve;
mod template;
mod watch;

pub use lang::{CConfig, CppConfig, JavaConfig, LangConfig, PythonConfig};
pub use precompile::PrecompileConfig;
pub use serve::ServeConfig;
pub use template::{SpecialTemplate, TemplateConfig};
pub use watch::WatchConfig;
