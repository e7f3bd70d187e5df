#![forbid(unsafe_code)]

//! Runtime layer: the tab-component contract, the panel registry, and the
//! router that drives mount/unmount transitions between them.

pub mod component;
pub mod panel;
pub mod router;

pub use component::{Ctx, TabComponent};
pub use panel::{Panel, Panels, SharedPanels};
pub use router::{
    LANDING_HIDE_DELAY, Router, SharedRouter, TAB_EXIT_DELAY, activate_direct, dispatch_input,
    enter_content, frame, install, navigate,
};
