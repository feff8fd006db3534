/*! Domain types shared by the platform layer and the dispatch engine. */

mod element;
mod window;

pub use element::{
  ActionKind, ElementFrame, ElementPath, ElementQuery, KeyModifier, MouseButton, TypeMode,
  UIElementInfo, WaitCondition,
};
pub use window::{MenuItemInfo, Permissions, ScreenSize, TargetApp, WindowInfo};
