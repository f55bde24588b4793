// Copyright 2021 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

pub mod logging;
#[cfg(feature = "output_format")]
pub mod output_format;
