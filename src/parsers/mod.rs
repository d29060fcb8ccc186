pub mod icu;
