// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Utility modules. For now just the interning tables the encoder builds.

pub mod dict_table;
