/*
 * SPDX-FileCopyrightText: 2026 The linkrank developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Miscellaneous utilities.

mod csr_matrix;
pub use csr_matrix::*;

mod granularity;
pub use granularity::*;
