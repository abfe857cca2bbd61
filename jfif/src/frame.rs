// Copyright (c) the JFIF-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod block;
pub mod coeff_order;
pub mod layout;
pub mod rle;
pub mod scan;

pub use layout::{ChromaSubsampling, FrameLayout};
