pub(crate) mod chart;
pub(crate) mod form;
pub(crate) mod list;
