//! antex lib test modules
